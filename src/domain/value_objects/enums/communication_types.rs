use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommunicationType {
    #[default]
    Email,
    Phone,
    Sms,
    Meeting,
    Note,
}

impl Display for CommunicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            CommunicationType::Email => "EMAIL",
            CommunicationType::Phone => "PHONE",
            CommunicationType::Sms => "SMS",
            CommunicationType::Meeting => "MEETING",
            CommunicationType::Note => "NOTE",
        };
        write!(f, "{}", kind)
    }
}

impl CommunicationType {
    pub fn from_str(value: &str) -> Self {
        match value {
            "PHONE" => CommunicationType::Phone,
            "SMS" => CommunicationType::Sms,
            "MEETING" => CommunicationType::Meeting,
            "NOTE" => CommunicationType::Note,
            _ => CommunicationType::Email,
        }
    }
}
