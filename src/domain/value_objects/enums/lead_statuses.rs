use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Converted,
    Lost,
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            LeadStatus::New => "NEW",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::Qualified => "QUALIFIED",
            LeadStatus::Proposal => "PROPOSAL",
            LeadStatus::Negotiation => "NEGOTIATION",
            LeadStatus::Converted => "CONVERTED",
            LeadStatus::Lost => "LOST",
        };
        write!(f, "{}", status)
    }
}

impl LeadStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "CONTACTED" => LeadStatus::Contacted,
            "QUALIFIED" => LeadStatus::Qualified,
            "PROPOSAL" => LeadStatus::Proposal,
            "NEGOTIATION" => LeadStatus::Negotiation,
            "CONVERTED" => LeadStatus::Converted,
            "LOST" => LeadStatus::Lost,
            _ => LeadStatus::New,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LeadStatus::Converted | LeadStatus::Lost)
    }
}
