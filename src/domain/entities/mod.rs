pub mod account_tokens;
pub mod bookings;
pub mod businesses;
pub mod communications;
pub mod customers;
pub mod leads;
pub mod plans;
pub mod services;
pub mod subscriptions;
pub mod time_slots;
pub mod users;
