use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Receiver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Receiver => "receiver",
        }
    }

    /// Name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Donor => "Donor",
            Role::Receiver => "Recipient",
        }
    }

    pub fn other(&self) -> Role {
        match self {
            Role::Donor => Role::Receiver,
            Role::Receiver => Role::Donor,
        }
    }
}
