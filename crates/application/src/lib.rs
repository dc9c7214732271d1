use domain::*;
use infrastructure::*;
use std::sync::Arc;
use tracing::info;

/// Registry Application - wires the SQLite adapters into the domain services
pub struct RegistryApp {
    pub user_service: UserService,
    pub profile_service: ProfileService,
    pub contact_service: EmergencyContactService,
    pub dashboard_service: DashboardService,
}

impl RegistryApp {
    /// Opens the database file at `database_path`, creating and migrating it as needed.
    pub fn new(database_path: &str) -> Result<Self, DomainError> {
        info!(database_path, "opening registry database");
        Ok(Self::from_database(Database::new(database_path)?))
    }

    /// Application backed by a private in-memory database.
    pub fn in_memory() -> Result<Self, DomainError> {
        Ok(Self::from_database(Database::in_memory()?))
    }

    fn from_database(database: Database) -> Self {
        let pool = database.get_pool().clone();

        // Create repository implementations
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool.clone()));
        let profile_repository: Arc<dyn ProfileRepository> =
            Arc::new(SqliteProfileRepository::new(pool.clone()));
        let contact_repository: Arc<dyn EmergencyContactRepository> =
            Arc::new(SqliteEmergencyContactRepository::new(pool));
        let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());

        // Domain services
        let user_service = UserService::new(
            user_repository.clone(),
            profile_repository.clone(),
            password_hasher,
        );

        let profile_service =
            ProfileService::new(user_repository.clone(), profile_repository.clone());

        let contact_service = EmergencyContactService::new(
            user_repository.clone(),
            profile_repository.clone(),
            contact_repository.clone(),
        );

        let dashboard_service =
            DashboardService::new(user_repository, profile_repository, contact_repository);

        Self {
            user_service,
            profile_service,
            contact_service,
            dashboard_service,
        }
    }
}
