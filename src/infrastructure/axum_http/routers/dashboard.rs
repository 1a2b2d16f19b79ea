use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    application::usecases::dashboard::DashboardUseCase,
    domain::repositories::{catalog::CatalogRepository, dashboard::DashboardRepository},
    infrastructure::{
        axum_http::error_responses,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{catalog::CatalogPostgres, dashboard::DashboardPostgres},
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    from: NaiveDate,
    to: NaiveDate,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let dashboard_repository = DashboardPostgres::new(Arc::clone(&db_pool));
    let catalog_repository = CatalogPostgres::new(Arc::clone(&db_pool));
    let usecase = DashboardUseCase::new(
        Arc::new(dashboard_repository),
        Arc::new(catalog_repository),
    );

    Router::new()
        .route("/businesses/:business_id/dashboard", get(business_overview))
        .route("/businesses/:business_id/calendar", get(calendar_feed))
        .route("/me/dashboard", get(client_overview))
        .with_state(Arc::new(usecase))
}

pub async fn business_overview<D, C>(
    State(usecase): State<Arc<DashboardUseCase<D, C>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse
where
    D: DashboardRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.business_overview(&auth_user, business_id).await {
        Ok(overview) => Json(overview).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn calendar_feed<D, C>(
    State(usecase): State<Arc<DashboardUseCase<D, C>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
    Query(query): Query<CalendarQuery>,
) -> impl IntoResponse
where
    D: DashboardRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase
        .calendar_feed(&auth_user, business_id, query.from, query.to)
        .await
    {
        Ok(events) => Json(events).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn client_overview<D, C>(
    State(usecase): State<Arc<DashboardUseCase<D, C>>>,
    auth_user: AuthUser,
) -> impl IntoResponse
where
    D: DashboardRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.client_overview(&auth_user).await {
        Ok(overview) => Json(overview).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}
