use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    application::usecases::catalog::CatalogUseCase,
    domain::{
        repositories::{catalog::CatalogRepository, subscriptions::SubscriptionRepository},
        value_objects::catalog::{
            AddStaffModel, CreateBusinessModel, CreateServiceModel, CreateTimeSlotsModel,
            UpdateServiceModel,
        },
    },
    infrastructure::{
        axum_http::error_responses,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{catalog::CatalogPostgres, subscriptions::SubscriptionPostgres},
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct OpenSlotsQuery {
    service_id: Uuid,
    date: NaiveDate,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let catalog_repository = CatalogPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let usecase = CatalogUseCase::new(
        Arc::new(catalog_repository),
        Arc::new(subscription_repository),
    );

    Router::new()
        .route("/businesses", post(create_business).get(list_my_businesses))
        .route(
            "/businesses/:business_id",
            get(get_business).delete(delete_business),
        )
        .route(
            "/businesses/:business_id/staff",
            post(add_staff).get(list_staff),
        )
        .route("/businesses/:business_id/services", get(list_services))
        .route(
            "/businesses/:business_id/time-slots",
            post(create_time_slots),
        )
        .route("/services", post(create_service))
        .route("/services/:service_id", patch(update_service))
        .route("/time-slots/open", get(list_open_slots))
        .with_state(Arc::new(usecase))
}

pub async fn create_business<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    auth_user: AuthUser,
    Json(body): Json<CreateBusinessModel>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    info!(owner_id = %auth_user.user_id, "catalog: create business request received");
    match usecase.create_business(&auth_user, body).await {
        Ok(business_id) => {
            (StatusCode::CREATED, Json(json!({ "id": business_id }))).into_response()
        }
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn list_my_businesses<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    auth_user: AuthUser,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.list_my_businesses(auth_user.user_id).await {
        Ok(businesses) => Json(businesses).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn get_business<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.get_business(business_id).await {
        Ok(business) => Json(business).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn delete_business<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.delete_business(&auth_user, business_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn add_staff<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
    Json(body): Json<AddStaffModel>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.add_staff(&auth_user, business_id, body).await {
        Ok(staff_id) => (StatusCode::CREATED, Json(json!({ "id": staff_id }))).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn list_staff<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.list_staff(&auth_user, business_id).await {
        Ok(staff) => Json(staff).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn create_service<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    auth_user: AuthUser,
    Json(body): Json<CreateServiceModel>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.create_service(&auth_user, body).await {
        Ok(service_id) => (StatusCode::CREATED, Json(json!({ "id": service_id }))).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn update_service<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    auth_user: AuthUser,
    Path(service_id): Path<Uuid>,
    Json(body): Json<UpdateServiceModel>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.update_service(&auth_user, service_id, body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn list_services<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.list_services(business_id).await {
        Ok(services) => Json(services).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn create_time_slots<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
    Json(body): Json<CreateTimeSlotsModel>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase
        .create_time_slots(&auth_user, business_id, body)
        .await
    {
        Ok(created) => (StatusCode::CREATED, Json(json!({ "created": created }))).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

/// Public availability feed for the booking widget.
pub async fn list_open_slots<C, S>(
    State(usecase): State<Arc<CatalogUseCase<C, S>>>,
    Query(query): Query<OpenSlotsQuery>,
) -> impl IntoResponse
where
    C: CatalogRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.list_open_slots(query.service_id, query.date).await {
        Ok(slots) => Json(slots).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}
