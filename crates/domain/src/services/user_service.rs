use crate::entities::User;
use crate::errors::DomainError;
use crate::repositories::{ProfileRepository, UserRepository};
use crate::security::PasswordHasher;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Result of a successful login: the account plus which role profiles it holds.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub is_donor: bool,
    pub is_receiver: bool,
}

impl LoginOutcome {
    pub fn profile_completed(&self) -> bool {
        self.is_donor || self.is_receiver
    }
}

/// Registration, authentication and account lookup.
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        profile_repository: Arc<dyn ProfileRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            profile_repository,
            password_hasher,
        }
    }

    pub async fn user_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.user_repository.find_by_email(email.trim()).await?.is_some())
    }

    /// Create a new user with business validation
    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        let name = registration.name.trim().to_string();
        let email = registration.email.trim().to_string();

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(DomainError::EmailAlreadyExists(email));
        }

        User::validate_registration(&name, &email, &registration.password)?;

        let password_hash = self.password_hasher.hash(&registration.password).await?;
        let user = self.user_repository.save(&User::new(name, email, password_hash)).await?;

        info!(user_id = ?user.id, "registered user");
        Ok(user)
    }

    /// Unknown email and wrong password fail identically with `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let Some(user) = self.user_repository.find_by_email(email.trim()).await? else {
            debug!("login attempt for unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.password_hasher.verify(password, &user.password_hash).await? {
            debug!(user_id = ?user.id, "login attempt with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let user_id = user.id.ok_or_else(|| DomainError::repository("stored user has no id"))?;
        let is_donor = self.profile_repository.find_donor(user_id).await?.is_some();
        let is_receiver = self.profile_repository.find_receiver(user_id).await?.is_some();

        info!(user_id, is_donor, is_receiver, "user logged in");
        Ok(LoginOutcome {
            user,
            is_donor,
            is_receiver,
        })
    }

    pub async fn get_user(&self, id: i32) -> Result<User, DomainError> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound)
    }
}
