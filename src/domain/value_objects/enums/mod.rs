pub mod billing_periods;
pub mod booking_statuses;
pub mod communication_types;
pub mod lead_sources;
pub mod lead_statuses;
pub mod payment_statuses;
pub mod subscription_statuses;
pub mod token_kinds;
pub mod user_roles;
