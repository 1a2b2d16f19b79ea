use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{business_staff, businesses};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = businesses)]
pub struct BusinessEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub slug: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = businesses)]
pub struct InsertBusinessEntity {
    pub owner_id: Uuid,
    pub name: String,
    pub slug: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = business_staff)]
pub struct BusinessStaffEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = business_staff)]
pub struct InsertBusinessStaffEntity {
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
