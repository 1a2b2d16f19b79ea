use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Resource, can_access},
    domain::{
        entities::{businesses::BusinessEntity, plans::PlanEntity},
        repositories::{catalog::CatalogRepository, subscriptions::SubscriptionRepository},
        value_objects::{
            catalog::{
                AddStaffModel, BusinessModel, CreateBusinessModel, CreateServiceModel,
                CreateTimeSlotsModel, ServiceModel, StaffModel, TimeSlotModel, UpdateServiceModel,
            },
            subscriptions::{new_trial_subscription, within_quota},
        },
    },
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("business not found")]
    BusinessNotFound,
    #[error("service not found")]
    ServiceNotFound,
    #[error("plan not found")]
    PlanNotFound,
    #[error("only the business owner can do this")]
    Forbidden,
    #[error("business has no active subscription")]
    NoActiveSubscription,
    #[error("plan quota for {0} reached")]
    QuotaExceeded(&'static str),
    #[error("invalid slot window: {0}")]
    InvalidSlotWindow(String),
    #[error("service does not belong to this business")]
    ServiceMismatch,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CatalogError::BusinessNotFound
            | CatalogError::ServiceNotFound
            | CatalogError::PlanNotFound => StatusCode::NOT_FOUND,
            CatalogError::Forbidden => StatusCode::FORBIDDEN,
            CatalogError::NoActiveSubscription | CatalogError::QuotaExceeded(_) => {
                StatusCode::PAYMENT_REQUIRED
            }
            CatalogError::InvalidSlotWindow(_) | CatalogError::ServiceMismatch => {
                StatusCode::BAD_REQUEST
            }
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CatalogError>;

pub struct CatalogUseCase<C, S>
where
    C: CatalogRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    catalog_repo: Arc<C>,
    subscription_repo: Arc<S>,
}

impl<C, S> CatalogUseCase<C, S>
where
    C: CatalogRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    pub fn new(catalog_repo: Arc<C>, subscription_repo: Arc<S>) -> Self {
        Self {
            catalog_repo,
            subscription_repo,
        }
    }

    async fn find_business_checked(&self, business_id: Uuid) -> UseCaseResult<BusinessEntity> {
        self.catalog_repo
            .find_business(business_id)
            .await
            .map_err(CatalogError::Internal)?
            .ok_or(CatalogError::BusinessNotFound)
    }

    fn ensure_owner(&self, business: &BusinessEntity, auth_user: &AuthUser) -> UseCaseResult<()> {
        if can_access(
            auth_user,
            Resource::OwnedBusiness {
                owner_id: business.owner_id,
            },
        ) {
            return Ok(());
        }
        warn!(
            business_id = %business.id,
            user_id = %auth_user.user_id,
            "catalog: rejected non-owner access"
        );
        Err(CatalogError::Forbidden)
    }

    async fn active_plan(&self, business_id: Uuid) -> UseCaseResult<PlanEntity> {
        let subscription = self
            .subscription_repo
            .find_by_business(business_id)
            .await
            .map_err(CatalogError::Internal)?
            .ok_or(CatalogError::NoActiveSubscription)?;

        if !subscription.is_active(Utc::now()) {
            return Err(CatalogError::NoActiveSubscription);
        }

        self.subscription_repo
            .find_plan(subscription.plan_id)
            .await
            .map_err(CatalogError::Internal)?
            .ok_or_else(|| {
                CatalogError::Internal(anyhow::anyhow!(
                    "subscription {} references missing plan {}",
                    subscription.id,
                    subscription.plan_id
                ))
            })
    }

    /// A new business starts on a trial of the chosen plan; the subscription
    /// row is created together with the business.
    pub async fn create_business(
        &self,
        auth_user: &AuthUser,
        create_model: CreateBusinessModel,
    ) -> UseCaseResult<Uuid> {
        info!(
            owner_id = %auth_user.user_id,
            plan_slug = %create_model.plan_slug,
            "catalog: creating business"
        );

        let plan = self
            .subscription_repo
            .find_plan_by_slug(&create_model.plan_slug)
            .await
            .map_err(CatalogError::Internal)?
            .filter(|plan| plan.is_active)
            .ok_or(CatalogError::PlanNotFound)?;

        let business_id = self
            .catalog_repo
            .create_business(create_model.to_entity(auth_user.user_id))
            .await
            .map_err(|err| {
                error!(db_error = ?err, "catalog: failed to create business");
                CatalogError::Internal(err)
            })?;

        self.subscription_repo
            .create(new_trial_subscription(business_id, &plan, Utc::now()))
            .await
            .map_err(CatalogError::Internal)?;

        info!(%business_id, "catalog: business created with trial subscription");
        Ok(business_id)
    }

    pub async fn list_my_businesses(&self, owner_id: Uuid) -> UseCaseResult<Vec<BusinessModel>> {
        let businesses = self
            .catalog_repo
            .list_businesses_by_owner(owner_id)
            .await
            .map_err(CatalogError::Internal)?;
        Ok(businesses.into_iter().map(BusinessModel::from).collect())
    }

    pub async fn get_business(&self, business_id: Uuid) -> UseCaseResult<BusinessModel> {
        let business = self.find_business_checked(business_id).await?;
        Ok(BusinessModel::from(business))
    }

    pub async fn delete_business(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
    ) -> UseCaseResult<()> {
        let business = self.find_business_checked(business_id).await?;
        self.ensure_owner(&business, auth_user)?;

        self.catalog_repo
            .delete_business(business_id)
            .await
            .map_err(CatalogError::Internal)?;

        info!(%business_id, "catalog: business deleted");
        Ok(())
    }

    pub async fn add_staff(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
        add_model: AddStaffModel,
    ) -> UseCaseResult<Uuid> {
        let business = self.find_business_checked(business_id).await?;
        self.ensure_owner(&business, auth_user)?;

        let plan = self.active_plan(business_id).await?;
        let current = self
            .catalog_repo
            .count_active_staff(business_id)
            .await
            .map_err(CatalogError::Internal)?;
        if !within_quota(plan.max_staff, current) {
            warn!(%business_id, current, quota = plan.max_staff, "catalog: staff quota reached");
            return Err(CatalogError::QuotaExceeded("staff"));
        }

        let staff_id = self
            .catalog_repo
            .add_staff(add_model.to_entity(business_id))
            .await
            .map_err(CatalogError::Internal)?;

        info!(%business_id, %staff_id, "catalog: staff member added");
        Ok(staff_id)
    }

    pub async fn list_staff(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
    ) -> UseCaseResult<Vec<StaffModel>> {
        let business = self.find_business_checked(business_id).await?;
        self.ensure_owner(&business, auth_user)?;

        let staff = self
            .catalog_repo
            .list_staff(business_id)
            .await
            .map_err(CatalogError::Internal)?;
        Ok(staff.into_iter().map(StaffModel::from).collect())
    }

    pub async fn create_service(
        &self,
        auth_user: &AuthUser,
        create_model: CreateServiceModel,
    ) -> UseCaseResult<Uuid> {
        let business = self.find_business_checked(create_model.business_id).await?;
        self.ensure_owner(&business, auth_user)?;

        let plan = self.active_plan(business.id).await?;
        let current = self
            .catalog_repo
            .count_active_services(business.id)
            .await
            .map_err(CatalogError::Internal)?;
        if !within_quota(plan.max_services, current) {
            warn!(
                business_id = %business.id,
                current,
                quota = plan.max_services,
                "catalog: service quota reached"
            );
            return Err(CatalogError::QuotaExceeded("services"));
        }

        let service_id = self
            .catalog_repo
            .create_service(create_model.to_entity())
            .await
            .map_err(CatalogError::Internal)?;

        info!(business_id = %business.id, %service_id, "catalog: service created");
        Ok(service_id)
    }

    pub async fn update_service(
        &self,
        auth_user: &AuthUser,
        service_id: Uuid,
        update_model: UpdateServiceModel,
    ) -> UseCaseResult<()> {
        let service = self
            .catalog_repo
            .find_service(service_id)
            .await
            .map_err(CatalogError::Internal)?
            .ok_or(CatalogError::ServiceNotFound)?;
        let business = self.find_business_checked(service.business_id).await?;
        self.ensure_owner(&business, auth_user)?;

        self.catalog_repo
            .update_service(service_id, update_model.to_entity())
            .await
            .map_err(CatalogError::Internal)?;

        info!(%service_id, "catalog: service updated");
        Ok(())
    }

    pub async fn list_services(&self, business_id: Uuid) -> UseCaseResult<Vec<ServiceModel>> {
        self.find_business_checked(business_id).await?;
        let services = self
            .catalog_repo
            .list_services(business_id)
            .await
            .map_err(CatalogError::Internal)?;
        Ok(services.into_iter().map(ServiceModel::from).collect())
    }

    pub async fn create_time_slots(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
        create_model: CreateTimeSlotsModel,
    ) -> UseCaseResult<usize> {
        let business = self.find_business_checked(business_id).await?;
        self.ensure_owner(&business, auth_user)?;

        let service = self
            .catalog_repo
            .find_service(create_model.service_id)
            .await
            .map_err(CatalogError::Internal)?
            .ok_or(CatalogError::ServiceNotFound)?;
        if service.business_id != business_id {
            return Err(CatalogError::ServiceMismatch);
        }

        if create_model.windows.is_empty() {
            return Err(CatalogError::InvalidSlotWindow(
                "at least one window is required".to_string(),
            ));
        }
        for window in &create_model.windows {
            if window.end_time <= window.start_time {
                return Err(CatalogError::InvalidSlotWindow(format!(
                    "window {}-{} ends before it starts",
                    window.start_time, window.end_time
                )));
            }
        }
        if create_model.max_bookings <= 0 {
            return Err(CatalogError::InvalidSlotWindow(
                "max_bookings must be positive".to_string(),
            ));
        }

        let created = self
            .catalog_repo
            .create_time_slots(create_model.to_entities(business_id))
            .await
            .map_err(CatalogError::Internal)?;

        info!(%business_id, created, "catalog: time slots created");
        Ok(created)
    }

    pub async fn list_open_slots(
        &self,
        service_id: Uuid,
        date: NaiveDate,
    ) -> UseCaseResult<Vec<TimeSlotModel>> {
        let slots = self
            .catalog_repo
            .list_open_slots(service_id, date)
            .await
            .map_err(CatalogError::Internal)?;
        Ok(slots.into_iter().map(TimeSlotModel::from).collect())
    }
}
