use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::value_objects::enums::subscription_statuses::SubscriptionStatus;
use crate::infrastructure::postgres::schema::subscriptions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub plan_id: Uuid,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub next_billing_date: DateTime<Utc>,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub last_payment_amount_minor: Option<i32>,
    pub current_month_bookings: i32,
    pub total_bookings: i32,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionEntity {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        matches!(
            SubscriptionStatus::from_str(&self.status),
            SubscriptionStatus::Trial | SubscriptionStatus::Active
        ) && self.end_date > now
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct InsertSubscriptionEntity {
    pub business_id: Uuid,
    pub plan_id: Uuid,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub next_billing_date: DateTime<Utc>,
    pub current_month_bookings: i32,
    pub total_bookings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
