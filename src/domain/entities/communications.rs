use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::communications;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = communications)]
pub struct CommunicationEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub type_: String,
    pub subject: String,
    pub content: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = communications)]
pub struct InsertCommunicationEntity {
    pub business_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub type_: String,
    pub subject: String,
    pub content: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
