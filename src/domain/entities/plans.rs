use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::plans;

pub const UNLIMITED_QUOTA: i32 = -1;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price_minor: i32,
    pub billing_period: String,
    pub trial_days: i32,
    pub max_staff: i32,
    pub max_services: i32,
    pub max_bookings_per_month: i32,
    pub features: serde_json::Value,
    pub is_popular: bool,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct InsertPlanEntity {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price_minor: i32,
    pub billing_period: String,
    pub trial_days: i32,
    pub max_staff: i32,
    pub max_services: i32,
    pub max_bookings_per_month: i32,
    pub features: serde_json::Value,
    pub is_popular: bool,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
