use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    account_tokens::{AccountTokenEntity, InsertAccountTokenEntity},
    users::{InsertUserEntity, UserEntity},
};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<Uuid>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
    async fn mark_verified(&self, user_id: Uuid) -> Result<()>;
    async fn update_password(&self, user_id: Uuid, password_hash: String) -> Result<()>;
    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()>;

    async fn create_token(&self, insert_token_entity: InsertAccountTokenEntity) -> Result<Uuid>;
    async fn find_token(&self, kind: &str, token: &str) -> Result<Option<AccountTokenEntity>>;
    async fn consume_token(&self, token_id: Uuid, at: DateTime<Utc>) -> Result<()>;
}
