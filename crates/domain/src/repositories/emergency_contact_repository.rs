use crate::entities::{EmergencyContact, NewEmergencyContact};
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait EmergencyContactRepository: Send + Sync {
    /// Contacts in insertion order.
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<EmergencyContact>, DomainError>;
    async fn count_by_user(&self, user_id: i32) -> Result<usize, DomainError>;
    /// Appends contacts unless the user would end up with more than `limit`,
    /// in which case nothing is written and `ContactLimitExceeded` is returned.
    async fn add_for_user(
        &self,
        user_id: i32,
        contacts: &[NewEmergencyContact],
        limit: usize,
    ) -> Result<Vec<EmergencyContact>, DomainError>;
}
