use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::NoShow => "NO_SHOW",
        };
        write!(f, "{}", status)
    }
}

impl BookingStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "CONFIRMED" => BookingStatus::Confirmed,
            "IN_PROGRESS" => BookingStatus::InProgress,
            "COMPLETED" => BookingStatus::Completed,
            "CANCELLED" => BookingStatus::Cancelled,
            "NO_SHOW" => BookingStatus::NoShow,
            _ => BookingStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    /// Forward-only progress, except that PENDING and CONFIRMED bookings may
    /// still be cancelled or marked as a no-show.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        match (self, next) {
            (BookingStatus::Pending, BookingStatus::Confirmed) => true,
            (BookingStatus::Confirmed, BookingStatus::InProgress) => true,
            (BookingStatus::InProgress, BookingStatus::Completed) => true,
            (
                BookingStatus::Pending | BookingStatus::Confirmed,
                BookingStatus::Cancelled | BookingStatus::NoShow,
            ) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_one_directional() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::InProgress));
        assert!(BookingStatus::InProgress.can_transition_to(BookingStatus::Completed));

        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::InProgress));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn only_pending_and_confirmed_can_cancel_or_no_show() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::NoShow));

        assert!(!BookingStatus::InProgress.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::NoShow));
    }

    #[test]
    fn repeated_terminal_transitions_are_rejected() {
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::NoShow.can_transition_to(BookingStatus::NoShow));
    }

    #[test]
    fn terminal_states() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::NoShow.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::InProgress.is_terminal());
    }
}
