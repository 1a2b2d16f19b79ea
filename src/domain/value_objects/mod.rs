pub mod bookings;
pub mod calendar;
pub mod catalog;
pub mod crm;
pub mod dashboard;
pub mod enums;
pub mod iam;
pub mod subscriptions;
