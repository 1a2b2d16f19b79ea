use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[default]
    Client,
    BusinessAdmin,
    BusinessStaff,
    SuperAdmin,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            UserRole::Client => "CLIENT",
            UserRole::BusinessAdmin => "BUSINESS_ADMIN",
            UserRole::BusinessStaff => "BUSINESS_STAFF",
            UserRole::SuperAdmin => "SUPER_ADMIN",
        };
        write!(f, "{}", role)
    }
}

impl UserRole {
    pub fn from_str(value: &str) -> Self {
        match value {
            "BUSINESS_ADMIN" => UserRole::BusinessAdmin,
            "BUSINESS_STAFF" => UserRole::BusinessStaff,
            "SUPER_ADMIN" => UserRole::SuperAdmin,
            _ => UserRole::Client,
        }
    }
}
