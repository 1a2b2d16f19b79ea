use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TokenKind {
    EmailVerification,
    PasswordReset,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            TokenKind::EmailVerification => "EMAIL_VERIFICATION",
            TokenKind::PasswordReset => "PASSWORD_RESET",
        };
        write!(f, "{}", kind)
    }
}
