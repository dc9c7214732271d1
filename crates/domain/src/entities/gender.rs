use serde::{Deserialize, Serialize};

/// Persisted as integer codes 1..=3, exchanged over the wire as names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn code(&self) -> i32 {
        match self {
            Gender::Male => 1,
            Gender::Female => 2,
            Gender::Other => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            3 => Some(Gender::Other),
            _ => None,
        }
    }

    /// Translates the free-text value submitted by the forms. Accepts names
    /// (any case) and the numeric codes; anything else is recorded as male.
    pub fn from_form_value(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "FEMALE" | "2" => Gender::Female,
            "OTHER" | "3" => Gender::Other,
            _ => Gender::Male,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}
