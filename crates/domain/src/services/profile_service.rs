use crate::entities::{
    BloodType, Donor, Gender, NewEmergencyContact, PhoneNumber, Receiver, Role, User,
    MAX_EMERGENCY_CONTACTS,
};
use crate::errors::DomainError;
use crate::repositories::{ProfileRepository, UserRepository};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// Donor profile form, still in its submitted free-text shape.
#[derive(Debug, Clone)]
pub struct DonorProfileRequest {
    pub email: String,
    pub blood_group: String,
    /// `None` records today's date.
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub mobile: Option<String>,
    pub home_phone: Option<String>,
    pub emergency_contacts: Vec<NewEmergencyContact>,
}

/// Recipient profile form, still in its submitted free-text shape.
#[derive(Debug, Clone)]
pub struct ReceiverProfileRequest {
    pub email: String,
    pub blood_unit: String,
    pub contact_details: Option<String>,
    pub doctor_mobile: Option<String>,
    pub emergency_contacts: Vec<NewEmergencyContact>,
}

/// Profile completion: attaches a donor or recipient profile to a registered user.
pub struct ProfileService {
    user_repository: Arc<dyn UserRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        profile_repository: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            user_repository,
            profile_repository,
        }
    }

    pub async fn complete_donor_profile(
        &self,
        request: DonorProfileRequest,
    ) -> Result<Donor, DomainError> {
        let user_id = self.find_user_id(&request.email).await?;
        self.ensure_no_profile(user_id, Role::Donor).await?;

        let phone = select_phone(request.mobile.as_deref(), request.home_phone.as_deref())?;
        ensure_contact_count(&request.emergency_contacts)?;

        let donor = Donor {
            user_id,
            blood_type: BloodType::from_blood_group(&request.blood_group),
            date_of_birth: request
                .date_of_birth
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            gender: Gender::from_form_value(&request.gender),
            phone,
        };

        let donor = self
            .profile_repository
            .create_donor(&donor, &request.emergency_contacts)
            .await?;

        info!(
            user_id,
            blood_type = %donor.blood_type,
            contacts = request.emergency_contacts.len(),
            "donor profile created"
        );
        Ok(donor)
    }

    pub async fn complete_receiver_profile(
        &self,
        request: ReceiverProfileRequest,
    ) -> Result<Receiver, DomainError> {
        let user_id = self.find_user_id(&request.email).await?;
        self.ensure_no_profile(user_id, Role::Receiver).await?;

        let phone = select_phone(
            request.contact_details.as_deref(),
            request.doctor_mobile.as_deref(),
        )?;
        ensure_contact_count(&request.emergency_contacts)?;

        let receiver = Receiver {
            user_id,
            required_blood_type: BloodType::from_blood_unit(&request.blood_unit),
            phone,
        };

        let receiver = self
            .profile_repository
            .create_receiver(&receiver, &request.emergency_contacts)
            .await?;

        info!(
            user_id,
            blood_type = %receiver.required_blood_type,
            contacts = request.emergency_contacts.len(),
            "recipient profile created"
        );
        Ok(receiver)
    }

    async fn find_user_id(&self, email: &str) -> Result<i32, DomainError> {
        let user: User = self
            .user_repository
            .find_by_email(email.trim())
            .await?
            .ok_or(DomainError::UserNotFound)?;
        user.id
            .ok_or_else(|| DomainError::repository("stored user has no id"))
    }

    /// Same-role duplicates are reported before cross-role conflicts.
    async fn ensure_no_profile(&self, user_id: i32, role: Role) -> Result<(), DomainError> {
        let has_donor = self.profile_repository.find_donor(user_id).await?.is_some();
        let has_receiver = self.profile_repository.find_receiver(user_id).await?.is_some();

        let (has_same, has_other) = match role {
            Role::Donor => (has_donor, has_receiver),
            Role::Receiver => (has_receiver, has_donor),
        };

        if has_same {
            return Err(DomainError::ProfileAlreadyExists(role));
        }
        if has_other {
            return Err(DomainError::RoleConflict(role.other()));
        }
        Ok(())
    }
}

/// First non-blank candidate wins; it must then be a valid phone number.
fn select_phone(primary: Option<&str>, fallback: Option<&str>) -> Result<PhoneNumber, DomainError> {
    let raw = [primary, fallback]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
        .ok_or_else(|| DomainError::validation("Phone number is required"))?;
    PhoneNumber::parse(raw)
}

fn ensure_contact_count(contacts: &[NewEmergencyContact]) -> Result<(), DomainError> {
    if contacts.len() > MAX_EMERGENCY_CONTACTS {
        return Err(DomainError::ContactLimitExceeded {
            limit: MAX_EMERGENCY_CONTACTS,
        });
    }
    Ok(())
}
