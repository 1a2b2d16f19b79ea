use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::services;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = services)]
pub struct ServiceEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: String,
    pub duration_minutes: i32,
    pub price_minor: i32,
    pub discounted_price_minor: Option<i32>,
    pub max_bookings_per_slot: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceEntity {
    /// The discounted price wins when one is set.
    pub fn current_price_minor(&self) -> i32 {
        self.discounted_price_minor.unwrap_or(self.price_minor)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = services)]
pub struct InsertServiceEntity {
    pub business_id: Uuid,
    pub name: String,
    pub description: String,
    pub duration_minutes: i32,
    pub price_minor: i32,
    pub discounted_price_minor: Option<i32>,
    pub max_bookings_per_slot: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = services)]
pub struct UpdateServiceEntity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price_minor: Option<i32>,
    pub discounted_price_minor: Option<Option<i32>>,
    pub max_bookings_per_slot: Option<i32>,
    pub is_active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
