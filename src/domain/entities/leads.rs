use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::leads;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = leads)]
pub struct LeadEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: String,
    pub source: String,
    pub notes: String,
    pub estimated_value_minor: i32,
    pub converted_at: Option<DateTime<Utc>>,
    pub converted_customer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = leads)]
pub struct InsertLeadEntity {
    pub business_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: String,
    pub source: String,
    pub notes: String,
    pub estimated_value_minor: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
