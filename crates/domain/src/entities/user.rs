use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Registered account. `password_hash` is a PHC string and never leaves the server.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i32>, // None for new users before persistence
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            name,
            email,
            password_hash,
        }
    }

    pub fn with_id(id: i32, name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Some(id),
            name,
            email,
            password_hash,
        }
    }

    /// Validates the identity fields of a registration before anything is hashed.
    pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), crate::DomainError> {
        if name.trim().is_empty() {
            return Err(crate::DomainError::validation("Name cannot be empty"));
        }

        validate_email(email)?;

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(crate::DomainError::validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), crate::DomainError> {
    if email.trim().is_empty() {
        return Err(crate::DomainError::validation("Email cannot be empty"));
    }

    if !email.contains('@') {
        return Err(crate::DomainError::validation("Invalid email format"));
    }

    Ok(())
}
