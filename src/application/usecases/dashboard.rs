use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Resource, can_access},
    domain::{
        repositories::{catalog::CatalogRepository, dashboard::DashboardRepository},
        value_objects::{
            bookings::BookingModel,
            calendar::CalendarEventModel,
            dashboard::{
                BusinessOverviewModel, ClientOverviewModel, TopServiceModel, daily_trend,
            },
        },
    },
};

const TREND_DAYS: i64 = 30;
const NEW_CUSTOMER_DAYS: i64 = 30;
const UPCOMING_LIMIT: i64 = 5;
const TOP_SERVICES_LIMIT: i64 = 5;
const CLIENT_UPCOMING_LIMIT: i64 = 10;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("business not found")]
    BusinessNotFound,
    #[error("not allowed to access this business")]
    Forbidden,
    #[error("invalid date range")]
    InvalidRange,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DashboardError::BusinessNotFound => StatusCode::NOT_FOUND,
            DashboardError::Forbidden => StatusCode::FORBIDDEN,
            DashboardError::InvalidRange => StatusCode::BAD_REQUEST,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, DashboardError>;

pub struct DashboardUseCase<D, C>
where
    D: DashboardRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
{
    dashboard_repo: Arc<D>,
    catalog_repo: Arc<C>,
}

impl<D, C> DashboardUseCase<D, C>
where
    D: DashboardRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
{
    pub fn new(dashboard_repo: Arc<D>, catalog_repo: Arc<C>) -> Self {
        Self {
            dashboard_repo,
            catalog_repo,
        }
    }

    async fn ensure_business_member(
        &self,
        business_id: Uuid,
        auth_user: &AuthUser,
    ) -> UseCaseResult<()> {
        let business = self
            .catalog_repo
            .find_business(business_id)
            .await
            .map_err(DashboardError::Internal)?
            .ok_or(DashboardError::BusinessNotFound)?;

        let operations = |is_active_staff| Resource::BusinessOperations {
            owner_id: business.owner_id,
            is_active_staff,
        };
        if can_access(auth_user, operations(false)) {
            return Ok(());
        }

        let staff = self
            .catalog_repo
            .list_staff(business_id)
            .await
            .map_err(DashboardError::Internal)?;
        let is_active_staff = staff
            .iter()
            .any(|member| member.user_id == auth_user.user_id && member.is_active);
        if can_access(auth_user, operations(is_active_staff)) {
            return Ok(());
        }

        warn!(
            %business_id,
            user_id = %auth_user.user_id,
            "dashboard: rejected non-member access"
        );
        Err(DashboardError::Forbidden)
    }

    pub async fn business_overview(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
    ) -> UseCaseResult<BusinessOverviewModel> {
        self.ensure_business_member(business_id, auth_user).await?;

        let today = Utc::now().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);
        let trend_start = today - Duration::days(TREND_DAYS - 1);
        let new_customers_since = today - Duration::days(NEW_CUSTOMER_DAYS);

        let today_bookings = self
            .dashboard_repo
            .count_bookings_between(business_id, today, today)
            .await
            .map_err(DashboardError::Internal)?;
        let today_revenue_minor = self
            .dashboard_repo
            .revenue_between(business_id, today, today)
            .await
            .map_err(DashboardError::Internal)?;
        let monthly_bookings = self
            .dashboard_repo
            .count_bookings_between(business_id, month_start, today)
            .await
            .map_err(DashboardError::Internal)?;
        let monthly_revenue_minor = self
            .dashboard_repo
            .revenue_between(business_id, month_start, today)
            .await
            .map_err(DashboardError::Internal)?;
        let pending_bookings = self
            .dashboard_repo
            .count_pending_on(business_id, today)
            .await
            .map_err(DashboardError::Internal)?;
        let new_customers = self
            .dashboard_repo
            .count_new_customers_since(business_id, new_customers_since)
            .await
            .map_err(DashboardError::Internal)?;
        let upcoming = self
            .dashboard_repo
            .upcoming_bookings(business_id, today, UPCOMING_LIMIT)
            .await
            .map_err(DashboardError::Internal)?;
        let booking_dates = self
            .dashboard_repo
            .booking_dates_between(business_id, trend_start, today)
            .await
            .map_err(DashboardError::Internal)?;
        let top_services = self
            .dashboard_repo
            .top_services(business_id, TOP_SERVICES_LIMIT)
            .await
            .map_err(DashboardError::Internal)?;

        Ok(BusinessOverviewModel {
            business_id,
            today_bookings,
            today_revenue_minor,
            monthly_bookings,
            monthly_revenue_minor,
            pending_bookings,
            new_customers,
            upcoming_bookings: upcoming.into_iter().map(BookingModel::from).collect(),
            trend: daily_trend(trend_start, today, &booking_dates),
            top_services: top_services
                .into_iter()
                .map(|(service_id, name, booking_count)| TopServiceModel {
                    service_id,
                    name,
                    booking_count,
                })
                .collect(),
        })
    }

    pub async fn calendar_feed(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> UseCaseResult<Vec<CalendarEventModel>> {
        self.ensure_business_member(business_id, auth_user).await?;

        if to < from {
            return Err(DashboardError::InvalidRange);
        }

        let rows = self
            .dashboard_repo
            .bookings_with_service_names(business_id, from, to)
            .await
            .map_err(DashboardError::Internal)?;
        Ok(rows
            .iter()
            .map(|(booking, service_name)| CalendarEventModel::from_booking(booking, service_name))
            .collect())
    }

    pub async fn client_overview(&self, auth_user: &AuthUser) -> UseCaseResult<ClientOverviewModel> {
        let today = Utc::now().date_naive();

        let upcoming = self
            .dashboard_repo
            .client_upcoming_bookings(auth_user.user_id, today, CLIENT_UPCOMING_LIMIT)
            .await
            .map_err(DashboardError::Internal)?;
        let (completed_bookings, total_bookings) = self
            .dashboard_repo
            .client_booking_counts(auth_user.user_id)
            .await
            .map_err(DashboardError::Internal)?;

        Ok(ClientOverviewModel {
            upcoming_bookings: upcoming.into_iter().map(BookingModel::from).collect(),
            completed_bookings,
            total_bookings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::user_roles::UserRole;
    use crate::domain::{
        entities::businesses::BusinessEntity,
        repositories::{catalog::MockCatalogRepository, dashboard::MockDashboardRepository},
    };

    fn member(user_id: Uuid) -> AuthUser {
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

    #[tokio::test]
    async fn overview_aggregates_counters() {
        let owner_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();

        let mut dash = MockDashboardRepository::new();
        dash.expect_count_bookings_between()
            .returning(|_, from, to| if from == to { Ok(4) } else { Ok(57) });
        dash.expect_revenue_between()
            .returning(|_, from, to| if from == to { Ok(12_000) } else { Ok(250_000) });
        dash.expect_count_pending_on().returning(|_, _| Ok(2));
        dash.expect_count_new_customers_since()
            .returning(|_, _| Ok(9));
        dash.expect_upcoming_bookings().returning(|_, _, _| Ok(vec![]));
        dash.expect_booking_dates_between()
            .returning(|_, _, _| Ok(vec![]));
        dash.expect_top_services().returning(|_, _| {
            Ok(vec![(Uuid::new_v4(), "Haircut".to_string(), 31)])
        });

        let usecase = DashboardUseCase::new(
            Arc::new(dash),
            Arc::new(catalog_with_business(business_id, owner_id)),
        );
        let overview = usecase
            .business_overview(&member(owner_id), business_id)
            .await
            .expect("overview should load");

        assert_eq!(overview.today_bookings, 4);
        assert_eq!(overview.monthly_bookings, 57);
        assert_eq!(overview.monthly_revenue_minor, 250_000);
        assert_eq!(overview.pending_bookings, 2);
        assert_eq!(overview.new_customers, 9);
        assert_eq!(overview.trend.len(), TREND_DAYS as usize);
        assert_eq!(overview.top_services[0].name, "Haircut");
        assert_eq!(overview.top_services[0].booking_count, 31);
    }

    #[tokio::test]
    async fn calendar_feed_rejects_inverted_range() {
        let owner_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();

        let usecase = DashboardUseCase::new(
            Arc::new(MockDashboardRepository::new()),
            Arc::new(catalog_with_business(business_id, owner_id)),
        );
        let result = usecase
            .calendar_feed(
                &member(owner_id),
                business_id,
                NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            )
            .await;

        assert!(matches!(result, Err(DashboardError::InvalidRange)));
    }

    #[tokio::test]
    async fn overview_requires_membership() {
        let business_id = Uuid::new_v4();

        let mut catalog = catalog_with_business(business_id, Uuid::new_v4());
        catalog.expect_list_staff().returning(|_| Ok(vec![]));

        let usecase = DashboardUseCase::new(Arc::new(MockDashboardRepository::new()), Arc::new(catalog));
        let result = usecase
            .business_overview(&member(Uuid::new_v4()), business_id)
            .await;

        assert!(matches!(result, Err(DashboardError::Forbidden)));
    }
}
