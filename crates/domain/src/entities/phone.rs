use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

pub const PHONE_DIGITS: usize = 10;

/// A phone number of exactly ten ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.len() != PHONE_DIGITS || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "Phone number must be exactly {} digits",
                PHONE_DIGITS
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ten_digits_after_trimming() {
        let phone = PhoneNumber::parse(" 0123456789 ").unwrap();
        assert_eq!(phone.as_str(), "0123456789");
    }

    #[test]
    fn rejects_wrong_length_or_non_digits() {
        for raw in ["", "123456789", "01234567890", "01234-6789", "+123456789", "０123456789"] {
            assert!(PhoneNumber::parse(raw).is_err(), "{raw:?}");
        }
    }
}
