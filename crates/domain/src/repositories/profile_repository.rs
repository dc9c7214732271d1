use crate::entities::{Donor, NewEmergencyContact, Receiver};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Role profiles attached to a user.
///
/// The `create_*` operations write the profile and its emergency contacts as one
/// unit: either everything is stored or nothing is. Implementations re-check,
/// inside that unit, that the user holds no profile of either role and that the
/// contact cap holds, failing with `ProfileAlreadyExists`, `RoleConflict` or
/// `ContactLimitExceeded` respectively.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_donor(&self, user_id: i32) -> Result<Option<Donor>, DomainError>;
    async fn find_receiver(&self, user_id: i32) -> Result<Option<Receiver>, DomainError>;
    async fn create_donor(
        &self,
        donor: &Donor,
        contacts: &[NewEmergencyContact],
    ) -> Result<Donor, DomainError>;
    async fn create_receiver(
        &self,
        receiver: &Receiver,
        contacts: &[NewEmergencyContact],
    ) -> Result<Receiver, DomainError>;
}
