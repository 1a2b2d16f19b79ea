use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{Connection, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            bookings::{BookingEntity, InsertBookingEntity},
            time_slots::TimeSlotEntity,
        },
        repositories::bookings::{BookingConflict, BookingRepository, CancelBookingArgs},
        value_objects::{
            bookings::BookingListFilter,
            enums::{booking_statuses::BookingStatus, payment_statuses::PaymentStatus},
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{bookings, customers, subscriptions, time_slots},
    },
};

pub struct BookingPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BookingPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BookingRepository for BookingPostgres {
    async fn create_booking(
        &self,
        insert_booking_entity: InsertBookingEntity,
    ) -> Result<BookingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<BookingEntity, anyhow::Error, _>(|tx| {
            if let Some(slot_id) = insert_booking_entity.time_slot_id {
                // Row lock so two concurrent requests cannot both pass the
                // capacity check against the same slot.
                let slot = time_slots::table
                    .find(slot_id)
                    .for_update()
                    .first::<TimeSlotEntity>(tx)
                    .optional()?
                    .ok_or(BookingConflict::SlotNotFound)?;

                if !slot.is_bookable() {
                    return Err(BookingConflict::SlotFull.into());
                }

                update(time_slots::table)
                    .filter(time_slots::id.eq(slot_id))
                    .set(time_slots::current_bookings.eq(time_slots::current_bookings + 1))
                    .execute(tx)?;
            }

            let booking = insert_into(bookings::table)
                .values(&insert_booking_entity)
                .get_result::<BookingEntity>(tx)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        anyhow::Error::from(BookingConflict::DuplicateBookingNumber)
                    }
                    other => anyhow::Error::from(other),
                })?;

            update(subscriptions::table)
                .filter(subscriptions::business_id.eq(booking.business_id))
                .set((
                    subscriptions::current_month_bookings
                        .eq(subscriptions::current_month_bookings + 1),
                    subscriptions::total_bookings.eq(subscriptions::total_bookings + 1),
                    subscriptions::updated_at.eq(booking.created_at),
                ))
                .execute(tx)?;

            update(customers::table)
                .filter(customers::id.eq(booking.customer_id))
                .set((
                    customers::total_bookings.eq(customers::total_bookings + 1),
                    customers::updated_at.eq(booking.created_at),
                ))
                .execute(tx)?;

            Ok(booking)
        })?;

        Ok(result)
    }

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .find(booking_id)
            .first::<BookingEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_bookings(
        &self,
        business_id: Uuid,
        filter: BookingListFilter,
    ) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = bookings::table
            .filter(bookings::business_id.eq(business_id))
            .into_boxed();

        if let Some(status) = filter.status {
            query = query.filter(bookings::status.eq(status.to_string()));
        }

        if let Some(date_from) = filter.date_from {
            query = query.filter(bookings::date.ge(date_from));
        }

        if let Some(date_to) = filter.date_to {
            query = query.filter(bookings::date.le(date_to));
        }

        if let Some(search) = filter.search {
            let pattern = format!("%{}%", search);
            query = query.filter(
                bookings::booking_number
                    .ilike(pattern.clone())
                    .or(bookings::customer_name.ilike(pattern.clone()))
                    .or(bookings::customer_email.ilike(pattern)),
            );
        }

        query = query.order((bookings::date.desc(), bookings::start_time.desc()));

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let results = query.load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_recent_by_customer(
        &self,
        customer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bookings::table
            .filter(bookings::customer_id.eq(customer_id))
            .order(bookings::created_at.desc())
            .limit(limit)
            .load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn confirm(&self, booking_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(bookings::table)
            .filter(bookings::id.eq(booking_id))
            .set((
                bookings::status.eq(BookingStatus::Confirmed.to_string()),
                bookings::confirmed_at.eq(at),
                bookings::updated_at.eq(at),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn start(&self, booking_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(bookings::table)
            .filter(bookings::id.eq(booking_id))
            .set((
                bookings::status.eq(BookingStatus::InProgress.to_string()),
                bookings::updated_at.eq(at),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn complete(&self, booking_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), diesel::result::Error, _>(|tx| {
            let booking = bookings::table
                .find(booking_id)
                .for_update()
                .first::<BookingEntity>(tx)?;

            // Re-check under the lock; a racing transition may have landed
            // between the usecase check and this transaction.
            let current = BookingStatus::from_str(&booking.status);
            if !current.can_transition_to(BookingStatus::Completed) {
                return Ok(());
            }

            update(bookings::table)
                .filter(bookings::id.eq(booking_id))
                .set((
                    bookings::status.eq(BookingStatus::Completed.to_string()),
                    bookings::payment_status.eq(PaymentStatus::Paid.to_string()),
                    bookings::completed_at.eq(at),
                    bookings::updated_at.eq(at),
                ))
                .execute(tx)?;

            update(customers::table)
                .filter(customers::id.eq(booking.customer_id))
                .set((
                    customers::total_spent_minor
                        .eq(customers::total_spent_minor + booking.total_amount_minor),
                    customers::last_visit.eq(at),
                    customers::updated_at.eq(at),
                ))
                .execute(tx)?;

            update(customers::table)
                .filter(customers::id.eq(booking.customer_id))
                .filter(customers::first_visit.is_null())
                .set(customers::first_visit.eq(at))
                .execute(tx)?;

            Ok(())
        })?;

        Ok(())
    }

    async fn cancel(&self, args: CancelBookingArgs) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), diesel::result::Error, _>(|tx| {
            let booking = bookings::table
                .find(args.booking_id)
                .for_update()
                .first::<BookingEntity>(tx)?;

            // Two concurrent cancels must not decrement the slot twice.
            let current = BookingStatus::from_str(&booking.status);
            if !current.can_transition_to(BookingStatus::Cancelled) {
                return Ok(());
            }

            update(bookings::table)
                .filter(bookings::id.eq(args.booking_id))
                .set((
                    bookings::status.eq(BookingStatus::Cancelled.to_string()),
                    bookings::cancelled_by.eq(args.cancelled_by),
                    bookings::cancellation_reason.eq(&args.reason),
                    bookings::cancelled_at.eq(args.at),
                    bookings::updated_at.eq(args.at),
                ))
                .execute(tx)?;

            if let Some(slot_id) = booking.time_slot_id {
                update(time_slots::table)
                    .filter(time_slots::id.eq(slot_id))
                    .filter(time_slots::current_bookings.gt(0))
                    .set(time_slots::current_bookings.eq(time_slots::current_bookings - 1))
                    .execute(tx)?;
            }

            update(customers::table)
                .filter(customers::id.eq(booking.customer_id))
                .set((
                    customers::cancellation_count.eq(customers::cancellation_count + 1),
                    customers::updated_at.eq(args.at),
                ))
                .execute(tx)?;

            Ok(())
        })?;

        Ok(())
    }

    async fn mark_no_show(&self, booking_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), diesel::result::Error, _>(|tx| {
            let booking = bookings::table
                .find(booking_id)
                .for_update()
                .first::<BookingEntity>(tx)?;

            let current = BookingStatus::from_str(&booking.status);
            if !current.can_transition_to(BookingStatus::NoShow) {
                return Ok(());
            }

            update(bookings::table)
                .filter(bookings::id.eq(booking_id))
                .set((
                    bookings::status.eq(BookingStatus::NoShow.to_string()),
                    bookings::updated_at.eq(at),
                ))
                .execute(tx)?;

            update(customers::table)
                .filter(customers::id.eq(booking.customer_id))
                .set((
                    customers::no_show_count.eq(customers::no_show_count + 1),
                    customers::updated_at.eq(at),
                ))
                .execute(tx)?;

            Ok(())
        })?;

        Ok(())
    }
}
