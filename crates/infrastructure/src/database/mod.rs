use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use domain::DomainError;
use tracing::info;

pub mod error;
pub mod schema;
pub use error::StoreError;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applied to every pooled connection.
#[derive(Debug)]
struct ConnectionPragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the SQLite file and applies pending migrations.
    pub fn new(database_path: &str) -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let pool = r2d2::Pool::builder()
            .connection_customizer(Box::new(ConnectionPragmas))
            .build(manager)
            .map_err(DomainError::repository)?;
        Self::migrated(pool)
    }

    /// Private in-memory database. The pool holds exactly one connection that
    /// never expires, since every SQLite connection to `:memory:` is its own database.
    pub fn in_memory() -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_customizer(Box::new(ConnectionPragmas))
            .build(manager)
            .map_err(DomainError::repository)?;
        Self::migrated(pool)
    }

    fn migrated(pool: SqlitePool) -> Result<Self, DomainError> {
        {
            let mut pooled = pool.get().map_err(DomainError::repository)?;
            let conn: &mut SqliteConnection = &mut pooled;
            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(DomainError::repository)?;
            if !applied.is_empty() {
                info!(count = applied.len(), "applied database migrations");
            }
        }
        Ok(Database { pool })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Checks out a connection and runs `work` on the blocking thread pool. The
/// connection goes back to the pool when `work` returns, on every path.
pub(crate) async fn run_blocking<T, F>(pool: &SqlitePool, work: F) -> Result<T, DomainError>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(DomainError::repository)?;
        work(&mut conn).map_err(DomainError::from)
    })
    .await
    .map_err(DomainError::repository)?
}
