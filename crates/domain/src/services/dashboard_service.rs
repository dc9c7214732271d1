use crate::entities::{BloodType, Donor, EmergencyContact, PhoneNumber, Receiver, User};
use crate::errors::DomainError;
use crate::repositories::{EmergencyContactRepository, ProfileRepository, UserRepository};
use chrono::NaiveDate;
use std::sync::Arc;

/// Everything known about a user, as read in one request.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub donor: Option<Donor>,
    pub receiver: Option<Receiver>,
    pub emergency_contacts: Vec<EmergencyContact>,
}

impl UserProfile {
    pub fn is_donor(&self) -> bool {
        self.donor.is_some()
    }

    pub fn is_receiver(&self) -> bool {
        self.receiver.is_some()
    }

    /// Donor blood type, falling back to the recipient's required type.
    pub fn blood_type(&self) -> Option<BloodType> {
        self.donor
            .as_ref()
            .map(|donor| donor.blood_type)
            .or_else(|| self.receiver.as_ref().map(|receiver| receiver.required_blood_type))
    }

    pub fn rh_factor(&self) -> Option<&'static str> {
        self.blood_type().map(|blood_type| blood_type.rh_factor())
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.donor
            .as_ref()
            .map(|donor| &donor.phone)
            .or_else(|| self.receiver.as_ref().map(|receiver| &receiver.phone))
    }

    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.donor.as_ref().map(|donor| donor.age_on(today))
    }
}

/// Read-only aggregation behind the profile and dashboard views.
pub struct DashboardService {
    user_repository: Arc<dyn UserRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
    contact_repository: Arc<dyn EmergencyContactRepository>,
}

impl DashboardService {
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

    pub async fn load_profile(&self, user_id: i32) -> Result<UserProfile, DomainError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        Ok(UserProfile {
            user,
            donor: self.profile_repository.find_donor(user_id).await?,
            receiver: self.profile_repository.find_receiver(user_id).await?,
            emergency_contacts: self.contact_repository.find_by_user(user_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{donor_for, Fixture};

    #[tokio::test]
    async fn profile_of_donor_derives_age_and_rh() {
        let fixture = Fixture::new();
        let user_id = fixture.registered("a@x.com").await;
        let mut donor = donor_for(user_id);
        donor.blood_type = BloodType::BNegative;
        donor.date_of_birth = NaiveDate::from_ymd_opt(1990, 12, 31).unwrap();
        fixture.store.insert_donor(donor);

        let profile = fixture.dashboard.load_profile(user_id).await.unwrap();

        assert!(profile.is_donor());
        assert!(!profile.is_receiver());
        assert_eq!(profile.rh_factor(), Some("Negative"));
        assert_eq!(profile.age_on(NaiveDate::from_ymd_opt(2020, 12, 30).unwrap()), Some(29));
        assert_eq!(profile.phone().map(PhoneNumber::as_str), Some("0123456789"));
    }

    #[tokio::test]
    async fn profile_without_role_has_no_derived_fields() {
        let fixture = Fixture::new();
        let user_id = fixture.registered("a@x.com").await;

        let profile = fixture.dashboard.load_profile(user_id).await.unwrap();

        assert_eq!(profile.blood_type(), None);
        assert_eq!(profile.rh_factor(), None);
        assert!(profile.phone().is_none());
        assert!(profile.emergency_contacts.is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let fixture = Fixture::new();
        assert_eq!(fixture.dashboard.load_profile(3).await.unwrap_err(), DomainError::UserNotFound);
    }
}
