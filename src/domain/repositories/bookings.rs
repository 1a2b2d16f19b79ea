use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    entities::bookings::{BookingEntity, InsertBookingEntity},
    value_objects::bookings::BookingListFilter,
};

/// Conflicts surfaced by the transactional create path. Carried inside the
/// `anyhow::Error` so callers can downcast and map them to user-facing
/// conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingConflict {
    #[error("time slot not found")]
    SlotNotFound,
    #[error("time slot is fully booked")]
    SlotFull,
    #[error("booking number already taken")]
    DuplicateBookingNumber,
}

pub struct CancelBookingArgs {
    pub booking_id: Uuid,
    pub cancelled_by: Uuid,
    pub reason: String,
    pub at: DateTime<Utc>,
}

#[automock]
#[async_trait]
pub trait BookingRepository {
    /// Inserts the booking and increments the slot counter as one atomic
    /// unit. The slot row is locked for the duration of the transaction so
    /// two concurrent requests cannot both pass the capacity check.
    async fn create_booking(&self, insert_booking_entity: InsertBookingEntity)
        -> Result<BookingEntity>;

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<BookingEntity>>;
    async fn list_bookings(
        &self,
        business_id: Uuid,
        filter: BookingListFilter,
    ) -> Result<Vec<BookingEntity>>;
    async fn list_recent_by_customer(
        &self,
        customer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BookingEntity>>;

    async fn confirm(&self, booking_id: Uuid, at: DateTime<Utc>) -> Result<()>;
    async fn start(&self, booking_id: Uuid, at: DateTime<Utc>) -> Result<()>;
    async fn complete(&self, booking_id: Uuid, at: DateTime<Utc>) -> Result<()>;
    /// Marks the booking cancelled and releases its slot capacity in the same
    /// transaction.
    async fn cancel(&self, args: CancelBookingArgs) -> Result<()>;
    async fn mark_no_show(&self, booking_id: Uuid, at: DateTime<Utc>) -> Result<()>;
}
