use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            account_tokens::{AccountTokenEntity, InsertAccountTokenEntity},
            users::{InsertUserEntity, UserEntity},
        },
        repositories::users::UserRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{account_tokens, users},
    },
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(users::table)
            .values(&insert_user_entity)
            .returning(users::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::email.eq(email))
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .find(user_id)
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn mark_verified(&self, user_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table)
            .filter(users::id.eq(user_id))
            .set((
                users::is_verified.eq(true),
                users::is_active.eq(true),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn update_password(&self, user_id: Uuid, password_hash: String) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table)
            .filter(users::id.eq(user_id))
            .set((
                users::password_hash.eq(password_hash),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table)
            .filter(users::id.eq(user_id))
            .set(users::last_login.eq(at))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn create_token(&self, insert_token_entity: InsertAccountTokenEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(account_tokens::table)
            .values(&insert_token_entity)
            .returning(account_tokens::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_token(&self, kind: &str, token: &str) -> Result<Option<AccountTokenEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = account_tokens::table
            .filter(account_tokens::kind.eq(kind))
            .filter(account_tokens::token.eq(token))
            .first::<AccountTokenEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn consume_token(&self, token_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(account_tokens::table)
            .filter(account_tokens::id.eq(token_id))
            .set(account_tokens::used_at.eq(at))
            .execute(&mut conn)?;

        Ok(())
    }
}
