use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::bookings;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bookings)]
pub struct BookingEntity {
    pub id: Uuid,
    pub booking_number: String,
    pub business_id: Uuid,
    pub service_id: Uuid,
    pub time_slot_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_notes: String,
    pub status: String,
    pub payment_status: String,
    pub service_price_minor: i32,
    pub discount_minor: i32,
    pub tax_minor: i32,
    pub total_amount_minor: i32,
    pub source: String,
    pub cancelled_by: Option<Uuid>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct InsertBookingEntity {
    pub booking_number: String,
    pub business_id: Uuid,
    pub service_id: Uuid,
    pub time_slot_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_notes: String,
    pub status: String,
    pub payment_status: String,
    pub service_price_minor: i32,
    pub discount_minor: i32,
    pub tax_minor: i32,
    pub total_amount_minor: i32,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
