use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    plans::PlanEntity,
    subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>>;
    async fn find_plan(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;
    async fn find_plan_by_slug(&self, slug: &str) -> Result<Option<PlanEntity>>;

    async fn create(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<Uuid>;
    async fn find_by_business(&self, business_id: Uuid) -> Result<Option<SubscriptionEntity>>;
    async fn cancel(&self, business_id: Uuid, reason: String, at: DateTime<Utc>) -> Result<()>;
}
