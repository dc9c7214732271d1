use crate::errors::DomainError;
use async_trait::async_trait;

/// One-way salted password hashing. This is a PORT; the adapter lives in
/// the infrastructure crate.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, DomainError>;
    /// `Ok(false)` on mismatch, `Err` only when `hash` is malformed.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
