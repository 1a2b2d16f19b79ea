use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Resource, can_access},
    domain::{
        repositories::{catalog::CatalogRepository, subscriptions::SubscriptionRepository},
        value_objects::{
            enums::subscription_statuses::SubscriptionStatus,
            subscriptions::{CancelSubscriptionModel, PlanModel, SubscriptionModel, UsageModel},
        },
    },
};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("business not found")]
    BusinessNotFound,
    #[error("business has no subscription")]
    SubscriptionNotFound,
    #[error("subscription is already cancelled")]
    AlreadyCancelled,
    #[error("only the business owner can manage the subscription")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::BusinessNotFound | SubscriptionError::SubscriptionNotFound => {
                StatusCode::NOT_FOUND
            }
            SubscriptionError::AlreadyCancelled => StatusCode::CONFLICT,
            SubscriptionError::Forbidden => StatusCode::FORBIDDEN,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<S, C>
where
    S: SubscriptionRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
{
    subscription_repo: Arc<S>,
    catalog_repo: Arc<C>,
}

impl<S, C> SubscriptionUseCase<S, C>
where
    S: SubscriptionRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
{
    pub fn new(subscription_repo: Arc<S>, catalog_repo: Arc<C>) -> Self {
        Self {
            subscription_repo,
            catalog_repo,
        }
    }

    async fn ensure_owner(&self, business_id: Uuid, auth_user: &AuthUser) -> UseCaseResult<()> {
        let business = self
            .catalog_repo
            .find_business(business_id)
            .await
            .map_err(SubscriptionError::Internal)?
            .ok_or(SubscriptionError::BusinessNotFound)?;

        if can_access(
            auth_user,
            Resource::OwnedBusiness {
                owner_id: business.owner_id,
            },
        ) {
            return Ok(());
        }

        warn!(
            %business_id,
            user_id = %auth_user.user_id,
            "subscriptions: rejected non-owner access"
        );
        Err(SubscriptionError::Forbidden)
    }

    pub async fn list_plans(&self) -> UseCaseResult<Vec<PlanModel>> {
        let plans = self
            .subscription_repo
            .list_active_plans()
            .await
            .map_err(SubscriptionError::Internal)?;
        Ok(plans.into_iter().map(PlanModel::from).collect())
    }

    pub async fn current(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
    ) -> UseCaseResult<SubscriptionModel> {
        self.ensure_owner(business_id, auth_user).await?;

        let subscription = self
            .subscription_repo
            .find_by_business(business_id)
            .await
            .map_err(SubscriptionError::Internal)?
            .ok_or(SubscriptionError::SubscriptionNotFound)?;
        Ok(SubscriptionModel::from(subscription))
    }

    pub async fn usage(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
    ) -> UseCaseResult<UsageModel> {
        self.ensure_owner(business_id, auth_user).await?;

        let subscription = self
            .subscription_repo
            .find_by_business(business_id)
            .await
            .map_err(SubscriptionError::Internal)?
            .ok_or(SubscriptionError::SubscriptionNotFound)?;
        let plan = self
            .subscription_repo
            .find_plan(subscription.plan_id)
            .await
            .map_err(SubscriptionError::Internal)?
            .ok_or_else(|| {
                SubscriptionError::Internal(anyhow::anyhow!(
                    "subscription {} references missing plan {}",
                    subscription.id,
                    subscription.plan_id
                ))
            })?;

        let staff_used = self
            .catalog_repo
            .count_active_staff(business_id)
            .await
            .map_err(SubscriptionError::Internal)?;
        let services_used = self
            .catalog_repo
            .count_active_services(business_id)
            .await
            .map_err(SubscriptionError::Internal)?;

        Ok(UsageModel {
            business_id,
            plan_slug: plan.slug,
            bookings_used: subscription.current_month_bookings,
            bookings_quota: plan.max_bookings_per_month,
            staff_used,
            staff_quota: plan.max_staff,
            services_used,
            services_quota: plan.max_services,
        })
    }

    pub async fn cancel(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
        cancel_model: CancelSubscriptionModel,
    ) -> UseCaseResult<()> {
        self.ensure_owner(business_id, auth_user).await?;

        let subscription = self
            .subscription_repo
            .find_by_business(business_id)
            .await
            .map_err(SubscriptionError::Internal)?
            .ok_or(SubscriptionError::SubscriptionNotFound)?;

        if SubscriptionStatus::from_str(&subscription.status) == SubscriptionStatus::Cancelled {
            return Err(SubscriptionError::AlreadyCancelled);
        }

        self.subscription_repo
            .cancel(business_id, cancel_model.reason, Utc::now())
            .await
            .map_err(SubscriptionError::Internal)?;

        info!(%business_id, "subscriptions: subscription cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::user_roles::UserRole;
    use crate::domain::{
        entities::{businesses::BusinessEntity, subscriptions::SubscriptionEntity},
        repositories::{
            catalog::MockCatalogRepository, subscriptions::MockSubscriptionRepository,
        },
    };
    use chrono::Duration;

    fn owner(user_id: Uuid) -> AuthUser {
        AuthUser {
            user_id,
            email: "owner@example.com".to_string(),
            role: UserRole::BusinessAdmin,
        }
    }

    fn catalog_with_business(business_id: Uuid, owner_id: Uuid) -> MockCatalogRepository {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_business().returning(move |_| {
            Ok(Some(BusinessEntity {
                id: business_id,
                owner_id,
                name: "Glow Studio".to_string(),
                slug: "glow-studio".to_string(),
                phone: String::new(),
                address: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });
        catalog
    }

    fn subscription(business_id: Uuid, status: &str) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            business_id,
            plan_id: Uuid::new_v4(),
            status: status.to_string(),
            start_date: now,
            end_date: now + Duration::days(30),
            trial_end_date: None,
            next_billing_date: now + Duration::days(30),
            last_payment_date: None,
            last_payment_amount_minor: None,
            current_month_bookings: 12,
            total_bookings: 40,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn cancel_rejects_already_cancelled() {
        let owner_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();

        let mut subs = MockSubscriptionRepository::new();
        subs.expect_find_by_business()
            .returning(move |_| Ok(Some(subscription(business_id, "CANCELLED"))));

        let usecase = SubscriptionUseCase::new(
            Arc::new(subs),
            Arc::new(catalog_with_business(business_id, owner_id)),
        );
        let result = usecase
            .cancel(
                &owner(owner_id),
                business_id,
                CancelSubscriptionModel {
                    reason: "too expensive".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(SubscriptionError::AlreadyCancelled)));
    }

    #[tokio::test]
    async fn current_requires_ownership() {
        let business_id = Uuid::new_v4();

        let subs = MockSubscriptionRepository::new();
        let usecase = SubscriptionUseCase::new(
            Arc::new(subs),
            Arc::new(catalog_with_business(business_id, Uuid::new_v4())),
        );
        let result = usecase.current(&owner(Uuid::new_v4()), business_id).await;

        assert!(matches!(result, Err(SubscriptionError::Forbidden)));
    }

    #[tokio::test]
    async fn usage_reports_quota_consumption() {
        let owner_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();
        let sub = subscription(business_id, "ACTIVE");
        let plan_id = sub.plan_id;

        let mut subs = MockSubscriptionRepository::new();
        subs.expect_find_by_business()
            .returning(move |_| Ok(Some(sub.clone())));
        subs.expect_find_plan().returning(move |_| {
            Ok(Some(crate::domain::entities::plans::PlanEntity {
                id: plan_id,
                name: "Starter".to_string(),
                slug: "starter".to_string(),
                description: String::new(),
                price_minor: 2900,
                billing_period: "MONTHLY".to_string(),
                trial_days: 14,
                max_staff: 5,
                max_services: 10,
                max_bookings_per_month: 100,
                features: serde_json::json!({}),
                is_popular: false,
                is_active: true,
                display_order: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });
        let mut catalog = catalog_with_business(business_id, owner_id);
        catalog.expect_count_active_staff().returning(|_| Ok(3));
        catalog.expect_count_active_services().returning(|_| Ok(7));

        let usecase = SubscriptionUseCase::new(Arc::new(subs), Arc::new(catalog));
        let usage = usecase
            .usage(&owner(owner_id), business_id)
            .await
            .expect("usage should load");

        assert_eq!(usage.bookings_used, 12);
        assert_eq!(usage.bookings_quota, 100);
        assert_eq!(usage.staff_used, 3);
        assert_eq!(usage.services_used, 7);
        assert_eq!(usage.plan_slug, "starter");
    }
}
