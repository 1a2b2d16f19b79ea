use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LeadSource {
    #[default]
    Website,
    SocialMedia,
    Referral,
    WalkIn,
    Phone,
    Email,
    Other,
}

impl Display for LeadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self {
            LeadSource::Website => "WEBSITE",
            LeadSource::SocialMedia => "SOCIAL_MEDIA",
            LeadSource::Referral => "REFERRAL",
            LeadSource::WalkIn => "WALK_IN",
            LeadSource::Phone => "PHONE",
            LeadSource::Email => "EMAIL",
            LeadSource::Other => "OTHER",
        };
        write!(f, "{}", source)
    }
}

impl LeadSource {
    pub fn from_str(value: &str) -> Self {
        match value {
            "SOCIAL_MEDIA" => LeadSource::SocialMedia,
            "REFERRAL" => LeadSource::Referral,
            "WALK_IN" => LeadSource::WalkIn,
            "PHONE" => LeadSource::Phone,
            "EMAIL" => LeadSource::Email,
            "OTHER" => LeadSource::Other,
            _ => LeadSource::Website,
        }
    }
}
