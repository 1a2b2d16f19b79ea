use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        plans::{PlanEntity, UNLIMITED_QUOTA},
        subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    },
    value_objects::enums::{
        billing_periods::BillingPeriod, subscription_statuses::SubscriptionStatus,
    },
};

/// Quota check run before the booking engine commits a new booking.
/// `-1` is the unlimited sentinel.
pub fn can_add_booking(max_bookings_per_month: i32, current_month_bookings: i32) -> bool {
    if max_bookings_per_month == UNLIMITED_QUOTA {
        return true;
    }
    current_month_bookings < max_bookings_per_month
}

pub fn within_quota(quota: i32, current: i64) -> bool {
    quota == UNLIMITED_QUOTA || current < quota as i64
}

/// Billing schedule computed once at subscription creation. The period is a
/// fixed-day approximation of the calendar cycle.
pub fn new_trial_subscription(
    business_id: Uuid,
    plan: &PlanEntity,
    start_date: DateTime<Utc>,
) -> InsertSubscriptionEntity {
    let period = BillingPeriod::from_str(&plan.billing_period);
    let end_date = start_date + Duration::days(period.period_days());
    let trial_end_date = if plan.trial_days > 0 {
        Some(start_date + Duration::days(plan.trial_days.into()))
    } else {
        None
    };

    InsertSubscriptionEntity {
        business_id,
        plan_id: plan.id,
        status: SubscriptionStatus::Trial.to_string(),
        start_date,
        end_date,
        trial_end_date,
        next_billing_date: end_date,
        current_month_bookings: 0,
        total_bookings: 0,
        created_at: start_date,
        updated_at: start_date,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanModel {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price_minor: i32,
    pub billing_period: BillingPeriod,
    pub trial_days: i32,
    pub max_staff: i32,
    pub max_services: i32,
    pub max_bookings_per_month: i32,
    pub features: serde_json::Value,
    pub is_popular: bool,
}

impl From<PlanEntity> for PlanModel {
    fn from(entity: PlanEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            slug: entity.slug,
            description: entity.description,
            price_minor: entity.price_minor,
            billing_period: BillingPeriod::from_str(&entity.billing_period),
            trial_days: entity.trial_days,
            max_staff: entity.max_staff,
            max_services: entity.max_services,
            max_bookings_per_month: entity.max_bookings_per_month,
            features: entity.features,
            is_popular: entity.is_popular,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionModel {
    pub id: Uuid,
    pub business_id: Uuid,
    pub plan_id: Uuid,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub next_billing_date: DateTime<Utc>,
    pub current_month_bookings: i32,
    pub total_bookings: i32,
    pub is_active: bool,
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(entity: SubscriptionEntity) -> Self {
        let is_active = entity.is_active(Utc::now());
        Self {
            id: entity.id,
            business_id: entity.business_id,
            plan_id: entity.plan_id,
            status: SubscriptionStatus::from_str(&entity.status),
            start_date: entity.start_date,
            end_date: entity.end_date,
            trial_end_date: entity.trial_end_date,
            next_billing_date: entity.next_billing_date,
            current_month_bookings: entity.current_month_bookings,
            total_bookings: entity.total_bookings,
            is_active,
        }
    }
}

/// Current consumption against the plan quotas; `-1` quotas are unlimited.
#[derive(Debug, Clone, Serialize)]
pub struct UsageModel {
    pub business_id: Uuid,
    pub plan_slug: String,
    pub bookings_used: i32,
    pub bookings_quota: i32,
    pub staff_used: i64,
    pub staff_quota: i32,
    pub services_used: i64,
    pub services_quota: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelSubscriptionModel {
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn plan(billing_period: &str, trial_days: i32, max_bookings_per_month: i32) -> PlanEntity {
        PlanEntity {
            id: Uuid::new_v4(),
            name: "Starter".to_string(),
            slug: "starter".to_string(),
            description: String::new(),
            price_minor: 2900,
            billing_period: billing_period.to_string(),
            trial_days,
            max_staff: 5,
            max_services: 10,
            max_bookings_per_month,
            features: serde_json::json!({}),
            is_popular: false,
            is_active: true,
            display_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unlimited_quota_always_allows_bookings() {
        assert!(can_add_booking(-1, 0));
        assert!(can_add_booking(-1, 100_000));
    }

    #[test]
    fn bounded_quota_blocks_at_limit() {
        assert!(can_add_booking(100, 99));
        assert!(!can_add_booking(100, 100));
        assert!(!can_add_booking(100, 150));
    }

    #[test]
    fn end_date_follows_billing_period() {
        let start = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();

        let monthly = new_trial_subscription(Uuid::new_v4(), &plan("MONTHLY", 0, 100), start);
        assert_eq!(monthly.end_date, start + Duration::days(30));
        assert_eq!(monthly.next_billing_date, monthly.end_date);

        let quarterly = new_trial_subscription(Uuid::new_v4(), &plan("QUARTERLY", 0, 100), start);
        assert_eq!(quarterly.end_date, start + Duration::days(90));

        let yearly = new_trial_subscription(Uuid::new_v4(), &plan("YEARLY", 0, 100), start);
        assert_eq!(yearly.end_date, start + Duration::days(365));

        let unknown = new_trial_subscription(Uuid::new_v4(), &plan("WEEKLY", 0, 100), start);
        assert_eq!(unknown.end_date, start + Duration::days(30));
    }

    #[test]
    fn trial_end_set_only_with_trial_days() {
        let start = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();

        let with_trial = new_trial_subscription(Uuid::new_v4(), &plan("MONTHLY", 14, 100), start);
        assert_eq!(with_trial.trial_end_date, Some(start + Duration::days(14)));

        let without_trial = new_trial_subscription(Uuid::new_v4(), &plan("MONTHLY", 0, 100), start);
        assert_eq!(without_trial.trial_end_date, None);
    }

    #[test]
    fn subscription_activity_window() {
        let now = Utc::now();
        let entity = SubscriptionEntity {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            status: "TRIAL".to_string(),
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(29),
            trial_end_date: None,
            next_billing_date: now + Duration::days(29),
            last_payment_date: None,
            last_payment_amount_minor: None,
            current_month_bookings: 0,
            total_bookings: 0,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };

        assert!(entity.is_active(now));

        let expired = SubscriptionEntity {
            end_date: now - Duration::days(1),
            ..entity.clone()
        };
        assert!(!expired.is_active(now));

        let cancelled = SubscriptionEntity {
            status: "CANCELLED".to_string(),
            ..entity
        };
        assert!(!cancelled.is_active(now));
    }
}
