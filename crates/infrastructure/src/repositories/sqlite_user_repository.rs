use crate::database::{run_blocking, users, SqlitePool, StoreError};
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{DomainError, User, UserRepository};

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserModel {
    id: i32,
    name: String,
    email: String,
    password_hash: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUserModel {
    name: String,
    email: String,
    password_hash: String,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User::with_id(model.id, model.name, model.email, model.password_hash)
    }
}

impl From<&User> for NewUserModel {
    fn from(user: &User) -> Self {
        NewUserModel {
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        }
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            Ok(users::table
                .filter(users::id.eq(id))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()?)
        })
        .await?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = email.to_string();
        let result = run_blocking(&self.pool, move |conn| {
            Ok(users::table
                .filter(users::email.eq(email))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()?)
        })
        .await?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let new_user = NewUserModel::from(user);

        let result = run_blocking(&self.pool, move |conn| {
            conn.immediate_transaction(|conn| {
                diesel::insert_into(users::table)
                    .values(&new_user)
                    .execute(conn)
                    .map_err(|e| {
                        StoreError::unique_violation_as(
                            e,
                            DomainError::EmailAlreadyExists(new_user.email.clone()),
                        )
                    })?;

                // Email is unique, so it identifies the row just written
                Ok(users::table
                    .filter(users::email.eq(new_user.email.as_str()))
                    .select(UserModel::as_select())
                    .first::<UserModel>(conn)?)
            })
        })
        .await?;

        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn repository() -> SqliteUserRepository {
        let database = Database::in_memory().unwrap();
        SqliteUserRepository::new(database.get_pool().clone())
    }

    #[tokio::test]
    async fn saved_users_can_be_found_by_id_and_email() {
        let repo = repository();
        let saved = repo
            .save(&User::new("A".into(), "a@x.com".into(), "hash".into()))
            .await
            .unwrap();

        let id = saved.id.unwrap();
        assert_eq!(repo.find_by_id(id).await.unwrap(), Some(saved.clone()));
        assert_eq!(repo.find_by_email("a@x.com").await.unwrap(), Some(saved));
        assert_eq!(repo.find_by_email("b@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unique_index_rejects_duplicate_email() {
        let repo = repository();
        let user = User::new("A".into(), "a@x.com".into(), "hash".into());
        repo.save(&user).await.unwrap();

        let err = repo.save(&user).await.unwrap_err();
        assert_eq!(err, DomainError::EmailAlreadyExists("a@x.com".into()));
    }
}
