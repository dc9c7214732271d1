use serde::{Deserialize, Serialize};

/// ABO/Rh blood type. Stored and serialized as its label, e.g. `"AB-"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    /// Fallback used whenever free-text input does not match a lookup table.
    pub const DEFAULT: BloodType = BloodType::OPositive;

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }

    /// Exact label lookup, used when reading stored rows.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|blood_type| blood_type.as_str() == label)
    }

    /// Maps a blood group typed into a form (`"ab+"`, `" O- "`) to a blood type.
    /// Unrecognised input maps to O+ rather than failing.
    pub fn from_blood_group(blood_group: &str) -> Self {
        let normalized = blood_group.trim().to_uppercase();
        Self::from_label(&normalized).unwrap_or(Self::DEFAULT)
    }

    /// Maps a requested blood product to the blood type recorded for a recipient.
    /// Unknown products map to O+.
    pub fn from_blood_unit(blood_unit: &str) -> Self {
        match blood_unit.trim() {
            "wholeBlood" => BloodType::OPositive,
            "packedCells" => BloodType::ONegative,
            "ffp" | "plasma" => BloodType::AbPositive,
            "plateletConc" => BloodType::APositive,
            _ => Self::DEFAULT,
        }
    }

    pub fn is_rh_positive(&self) -> bool {
        self.as_str().ends_with('+')
    }

    pub fn rh_factor(&self) -> &'static str {
        if self.is_rh_positive() {
            "Positive"
        } else {
            "Negative"
        }
    }
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
