use super::{BloodType, PhoneNumber};
use serde::{Deserialize, Serialize};

/// Recipient profile, keyed by the owning user's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub user_id: i32,
    pub required_blood_type: BloodType,
    pub phone: PhoneNumber,
}
