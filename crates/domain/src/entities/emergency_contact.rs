use super::user::validate_email;
use super::PhoneNumber;
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

pub const MAX_EMERGENCY_CONTACTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub phone: PhoneNumber,
    pub email: String,
    pub relation: String,
}

/// A validated contact that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmergencyContact {
    pub name: String,
    pub phone: PhoneNumber,
    pub email: String,
    pub relation: String,
}

impl NewEmergencyContact {
    pub fn new(name: &str, phone: &str, email: &str, relation: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Emergency contact name cannot be empty"));
        }

        let relation = relation.trim();
        if relation.is_empty() {
            return Err(DomainError::validation("Emergency contact relation cannot be empty"));
        }

        let email = email.trim();
        validate_email(email)?;

        Ok(Self {
            name: name.to_string(),
            phone: PhoneNumber::parse(phone)?,
            email: email.to_string(),
            relation: relation.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_validates_fields() {
        let contact = NewEmergencyContact::new(" Jane ", "0123456789", "jane@x.com ", "Sister").unwrap();
        assert_eq!(contact.name, "Jane");
        assert_eq!(contact.email, "jane@x.com");
        assert_eq!(contact.phone.as_str(), "0123456789");
    }

    #[test]
    fn rejects_incomplete_contacts() {
        assert!(NewEmergencyContact::new("", "0123456789", "j@x.com", "Sister").is_err());
        assert!(NewEmergencyContact::new("Jane", "12345", "j@x.com", "Sister").is_err());
        assert!(NewEmergencyContact::new("Jane", "0123456789", "jx.com", "Sister").is_err());
        assert!(NewEmergencyContact::new("Jane", "0123456789", "j@x.com", " ").is_err());
    }
}
