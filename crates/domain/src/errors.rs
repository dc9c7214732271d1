use crate::entities::Role;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{0}")]
    ValidationError(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{} profile already exists for this user", .0.display_name())]
    ProfileAlreadyExists(Role),

    /// The user already holds the other role's profile.
    #[error("User is already registered as a {}", .0.as_str())]
    RoleConflict(Role),

    #[error("Complete a donor or recipient profile before adding emergency contacts")]
    ProfileRequired,

    #[error("Only {limit} emergency contacts allowed per user")]
    ContactLimitExceeded { limit: usize },

    #[error("Password hashing error: {0}")]
    HashingError(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn repository(message: impl ToString) -> Self {
        Self::RepositoryError(message.to_string())
    }

    /// Failures caused by the server rather than the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::HashingError(_) | Self::RepositoryError(_))
    }
}
