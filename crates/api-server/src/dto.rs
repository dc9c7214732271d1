//! Wire shapes for the registry API. Form structs keep the field names the
//! front-end submits (`bloodGroup`, `name1`, ...); responses use snake_case.

use chrono::{NaiveDate, Utc};
use domain::{
    BloodType, Donor, DonorProfileRequest, DomainError, EmergencyContact, Gender, LoginOutcome,
    NewEmergencyContact, Receiver, ReceiverProfileRequest, Registration, User, UserProfile,
};
use serde::{Deserialize, Serialize};

pub const DONOR_FORM_PAGE: &str = "/set.html";
pub const RECIPIENT_FORM_PAGE: &str = "/setupr.html";
pub const DASHBOARD_PAGE: &str = "/dashboard.html";

// ---- requests ----

#[derive(Debug, Deserialize)]
pub struct UserExistsQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "userType")]
    pub user_type: Option<String>,
}

impl RegisterForm {
    /// Page the client should open next to complete a profile.
    pub fn next_page(&self) -> &'static str {
        match self.user_type.as_deref().map(str::trim) {
            None | Some("") | Some("donor") => DONOR_FORM_PAGE,
            Some(_) => RECIPIENT_FORM_PAGE,
        }
    }

    pub fn into_registration(self) -> Registration {
        Registration {
            name: self.name,
            email: self.email,
            password: self.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// The two emergency contacts embedded in the profile forms. The first is
/// required; the second is only taken when all four of its fields are filled.
#[derive(Debug, Default, Deserialize)]
pub struct InlineContacts {
    pub name1: Option<String>,
    pub phone1: Option<String>,
    pub email1: Option<String>,
    pub relation1: Option<String>,
    pub name2: Option<String>,
    pub phone2: Option<String>,
    pub email2: Option<String>,
    pub relation2: Option<String>,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl InlineContacts {
    pub fn to_contacts(&self) -> Result<Vec<NewEmergencyContact>, DomainError> {
        let first = [&self.name1, &self.phone1, &self.email1, &self.relation1].map(filled);
        let [Some(name), Some(phone), Some(email), Some(relation)] = first else {
            return Err(DomainError::validation(
                "Emergency contact 1 requires name, phone, email and relation",
            ));
        };
        let mut contacts = vec![NewEmergencyContact::new(name, phone, email, relation)?];

        let second = [&self.name2, &self.phone2, &self.email2, &self.relation2].map(filled);
        if let [Some(name), Some(phone), Some(email), Some(relation)] = second {
            contacts.push(NewEmergencyContact::new(name, phone, email, relation)?);
        }

        Ok(contacts)
    }
}

fn parse_date_of_birth(raw: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DomainError::validation("Invalid date of birth, expected YYYY-MM-DD")),
    }
}

#[derive(Debug, Deserialize)]
pub struct DonorForm {
    pub email: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: String,
    pub dob: Option<String>,
    pub gender: String,
    pub mobile: Option<String>,
    #[serde(rename = "homePhone")]
    pub home_phone: Option<String>,
    #[serde(flatten)]
    pub contacts: InlineContacts,
}

impl TryFrom<DonorForm> for DonorProfileRequest {
    type Error = DomainError;

    fn try_from(form: DonorForm) -> Result<Self, Self::Error> {
        Ok(DonorProfileRequest {
            date_of_birth: parse_date_of_birth(form.dob.as_deref())?,
            emergency_contacts: form.contacts.to_contacts()?,
            email: form.email,
            blood_group: form.blood_group,
            gender: form.gender,
            mobile: form.mobile,
            home_phone: form.home_phone,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RecipientForm {
    pub email: String,
    #[serde(rename = "bloodUnit")]
    pub blood_unit: String,
    #[serde(rename = "contactDetails")]
    pub contact_details: Option<String>,
    #[serde(rename = "doctorMobile")]
    pub doctor_mobile: Option<String>,
    #[serde(flatten)]
    pub contacts: InlineContacts,
}

impl TryFrom<RecipientForm> for ReceiverProfileRequest {
    type Error = DomainError;

    fn try_from(form: RecipientForm) -> Result<Self, Self::Error> {
        Ok(ReceiverProfileRequest {
            emergency_contacts: form.contacts.to_contacts()?,
            email: form.email,
            blood_unit: form.blood_unit,
            contact_details: form.contact_details,
            doctor_mobile: form.doctor_mobile,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub relation: String,
}

impl TryFrom<&ContactPayload> for NewEmergencyContact {
    type Error = DomainError;

    fn try_from(payload: &ContactPayload) -> Result<Self, Self::Error> {
        NewEmergencyContact::new(&payload.name, &payload.phone, &payload.email, &payload.relation)
    }
}

// ---- responses ----

#[derive(Debug, Serialize, Deserialize)]
pub struct UserExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Option<i32>,
    pub name: String,
    pub email: String,
    pub redirect: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: Option<i32>,
    pub email: String,
    pub name: String,
    pub is_donor: bool,
    pub is_receiver: bool,
    pub redirect: String,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        let (message, redirect) = if outcome.profile_completed() {
            ("Login successful", DASHBOARD_PAGE)
        } else {
            ("Please complete your profile", DONOR_FORM_PAGE)
        };

        Self {
            message: message.to_string(),
            user_id: outcome.user.id,
            email: outcome.user.email,
            name: outcome.user.name,
            is_donor: outcome.is_donor,
            is_receiver: outcome.is_receiver,
            redirect: redirect.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileSubmittedResponse {
    pub message: String,
    pub user_id: i32,
    pub redirect: String,
}

impl ProfileSubmittedResponse {
    pub fn new(message: &str, user_id: i32) -> Self {
        Self {
            message: message.to_string(),
            user_id,
            redirect: DASHBOARD_PAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactDto {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub relation: String,
}

impl From<EmergencyContact> for ContactDto {
    fn from(contact: EmergencyContact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            phone: contact.phone.into_inner(),
            email: contact.email,
            relation: contact.relation,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddContactsResponse {
    pub message: String,
    pub emergency_contacts: Vec<ContactDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub blood_group: Option<BloodType>,
    pub rh_factor: Option<String>,
    pub dob: Option<NaiveDate>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserDto,
    pub is_donor: bool,
    pub is_receiver: bool,
    pub profile: ProfileDetails,
    pub emergency_contacts: Vec<ContactDto>,
}

impl ProfileResponse {
    pub fn new(profile: UserProfile, today: NaiveDate) -> Self {
        let details = ProfileDetails {
            blood_group: profile.blood_type(),
            rh_factor: profile.rh_factor().map(str::to_string),
            dob: profile.donor.as_ref().map(|donor| donor.date_of_birth),
            age: profile.age_on(today),
            gender: profile.donor.as_ref().map(|donor| donor.gender),
            phone: profile.phone().map(|phone| phone.as_str().to_string()),
        };

        Self {
            is_donor: profile.is_donor(),
            is_receiver: profile.is_receiver(),
            profile: details,
            user: profile.user.into(),
            emergency_contacts: profile.emergency_contacts.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DonorDto {
    pub blood_type: BloodType,
    pub dob: NaiveDate,
    pub age: i32,
    pub gender: Gender,
    pub phone: String,
}

impl DonorDto {
    fn new(donor: Donor, today: NaiveDate) -> Self {
        Self {
            age: donor.age_on(today),
            blood_type: donor.blood_type,
            dob: donor.date_of_birth,
            gender: donor.gender,
            phone: donor.phone.into_inner(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiverDto {
    pub required_blood_type: BloodType,
    pub rh_factor: String,
    pub phone: String,
}

impl From<Receiver> for ReceiverDto {
    fn from(receiver: Receiver) -> Self {
        Self {
            required_blood_type: receiver.required_blood_type,
            rh_factor: receiver.required_blood_type.rh_factor().to_string(),
            phone: receiver.phone.into_inner(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub user: UserDto,
    pub is_donor: bool,
    pub is_receiver: bool,
    pub donor_profile: Option<DonorDto>,
    pub receiver_profile: Option<ReceiverDto>,
    pub emergency_contacts: Vec<ContactDto>,
}

impl DashboardResponse {
    pub fn new(profile: UserProfile, today: NaiveDate) -> Self {
        Self {
            is_donor: profile.is_donor(),
            is_receiver: profile.is_receiver(),
            user: profile.user.into(),
            donor_profile: profile.donor.map(|donor| DonorDto::new(donor, today)),
            receiver_profile: profile.receiver.map(Into::into),
            emergency_contacts: profile.emergency_contacts.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
