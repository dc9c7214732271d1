use crate::entities::{EmergencyContact, NewEmergencyContact, MAX_EMERGENCY_CONTACTS};
use crate::errors::DomainError;
use crate::repositories::{EmergencyContactRepository, ProfileRepository, UserRepository};
use std::sync::Arc;
use tracing::info;

/// Emergency contacts added after profile completion.
pub struct EmergencyContactService {
    user_repository: Arc<dyn UserRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
    contact_repository: Arc<dyn EmergencyContactRepository>,
}

impl EmergencyContactService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        profile_repository: Arc<dyn ProfileRepository>,
        contact_repository: Arc<dyn EmergencyContactRepository>,
    ) -> Self {
        Self {
            user_repository,
            profile_repository,
            contact_repository,
        }
    }

    pub async fn add_contacts(
        &self,
        user_id: i32,
        contacts: Vec<NewEmergencyContact>,
    ) -> Result<Vec<EmergencyContact>, DomainError> {
        if self.user_repository.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::UserNotFound);
        }

        let has_profile = self.profile_repository.find_donor(user_id).await?.is_some()
            || self.profile_repository.find_receiver(user_id).await?.is_some();
        if !has_profile {
            return Err(DomainError::ProfileRequired);
        }

        if contacts.is_empty() {
            return Err(DomainError::validation("At least one emergency contact is required"));
        }

        let existing = self.contact_repository.count_by_user(user_id).await?;
        if existing + contacts.len() > MAX_EMERGENCY_CONTACTS {
            return Err(DomainError::ContactLimitExceeded {
                limit: MAX_EMERGENCY_CONTACTS,
            });
        }

        // The repository repeats the count inside its write transaction.
        let stored = self
            .contact_repository
            .add_for_user(user_id, &contacts, MAX_EMERGENCY_CONTACTS)
            .await?;

        info!(user_id, added = stored.len(), "emergency contacts added");
        Ok(stored)
    }

    pub async fn list_contacts(&self, user_id: i32) -> Result<Vec<EmergencyContact>, DomainError> {
        self.contact_repository.find_by_user(user_id).await
    }
}
