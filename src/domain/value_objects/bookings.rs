use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::bookings::BookingEntity,
    value_objects::enums::{booking_statuses::BookingStatus, payment_statuses::PaymentStatus},
};

/// Total owed for a booking, floored at zero so a discount larger than the
/// price can never produce a negative charge.
pub fn calculate_total_minor(service_price_minor: i32, discount_minor: i32, tax_minor: i32) -> i32 {
    (service_price_minor - discount_minor + tax_minor).max(0)
}

/// `BK` + booking date + 4-digit random suffix. The suffix alone does not
/// guarantee uniqueness; callers retry with a fresh suffix when the insert
/// hits the unique constraint.
pub fn generate_booking_number(date: NaiveDate, rng: &mut impl Rng) -> String {
    let suffix: u32 = rng.gen_range(1000..=9999);
    format!("BK{}{}", date.format("%Y%m%d"), suffix)
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingCustomerModel {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingModel {
    pub time_slot_id: Uuid,
    pub customer: BookingCustomerModel,
    #[serde(default)]
    pub discount_minor: i32,
    #[serde(default)]
    pub tax_minor: i32,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "WEBSITE".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelBookingModel {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListFilter {
    pub status: Option<BookingStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingModel {
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
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub service_price_minor: i32,
    pub discount_minor: i32,
    pub tax_minor: i32,
    pub total_amount_minor: i32,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<BookingEntity> for BookingModel {
    fn from(entity: BookingEntity) -> Self {
        Self {
            id: entity.id,
            booking_number: entity.booking_number,
            business_id: entity.business_id,
            service_id: entity.service_id,
            time_slot_id: entity.time_slot_id,
            customer_id: entity.customer_id,
            date: entity.date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            customer_name: entity.customer_name,
            customer_email: entity.customer_email,
            customer_phone: entity.customer_phone,
            status: BookingStatus::from_str(&entity.status),
            payment_status: PaymentStatus::from_str(&entity.payment_status),
            service_price_minor: entity.service_price_minor,
            discount_minor: entity.discount_minor,
            tax_minor: entity.tax_minor,
            total_amount_minor: entity.total_amount_minor,
            created_at: entity.created_at,
            confirmed_at: entity.confirmed_at,
            cancelled_at: entity.cancelled_at,
            completed_at: entity.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_price_minus_discount_plus_tax() {
        assert_eq!(calculate_total_minor(100, 20, 5), 85);
        assert_eq!(calculate_total_minor(100, 0, 0), 100);
    }

    #[test]
    fn total_floors_at_zero() {
        assert_eq!(calculate_total_minor(10, 50, 0), 0);
        assert_eq!(calculate_total_minor(0, 1, 0), 0);
    }

    #[test]
    fn booking_number_format() {
        let mut rng = rand::thread_rng();
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let number = generate_booking_number(date, &mut rng);

        assert_eq!(number.len(), 14);
        assert!(number.starts_with("BK20260825"));
        let suffix: u32 = number[10..].parse().unwrap();
        assert!((1000..=9999).contains(&suffix));
    }
}
