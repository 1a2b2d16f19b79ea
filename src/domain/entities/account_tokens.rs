use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::account_tokens;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = account_tokens)]
pub struct AccountTokenEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl AccountTokenEntity {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = account_tokens)]
pub struct InsertAccountTokenEntity {
    pub user_id: Uuid,
    pub kind: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}
