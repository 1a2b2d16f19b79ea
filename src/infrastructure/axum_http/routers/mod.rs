pub mod bookings;
pub mod catalog;
pub mod crm;
pub mod dashboard;
pub mod identity;
pub mod subscriptions;
