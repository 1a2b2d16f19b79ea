use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    application::usecases::bookings::BookingUseCase,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            bookings::BookingRepository, catalog::CatalogRepository, crm::CrmRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::bookings::{BookingListFilter, CancelBookingModel, CreateBookingModel},
    },
    infrastructure::{
        axum_http::error_responses,
        email::{EmailQueue, LogEmailSender},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                bookings::BookingPostgres, catalog::CatalogPostgres, crm::CrmPostgres,
                subscriptions::SubscriptionPostgres,
            },
        },
    },
};

const DEFAULT_HISTORY_LIMIT: i64 = 5;
const MAX_HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    limit: Option<i64>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let booking_repository = BookingPostgres::new(Arc::clone(&db_pool));
    let catalog_repository = CatalogPostgres::new(Arc::clone(&db_pool));
    let crm_repository = CrmPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let mailer = EmailQueue::new(Arc::new(LogEmailSender::new(
        config.email.from_address.clone(),
    )));
    let usecase = BookingUseCase::new(
        Arc::new(booking_repository),
        Arc::new(catalog_repository),
        Arc::new(crm_repository),
        Arc::new(subscription_repository),
        mailer,
    );

    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/:booking_id", get(get_booking))
        .route("/bookings/:booking_id/confirm", post(confirm_booking))
        .route("/bookings/:booking_id/start", post(start_booking))
        .route("/bookings/:booking_id/complete", post(complete_booking))
        .route("/bookings/:booking_id/cancel", post(cancel_booking))
        .route("/bookings/:booking_id/no-show", post(mark_no_show))
        .route("/businesses/:business_id/bookings", get(list_bookings))
        .route(
            "/customers/:customer_id/bookings",
            get(customer_booking_history),
        )
        .with_state(Arc::new(usecase))
}

/// Public endpoint; the booking widget posts here without an account.
pub async fn create_booking<B, C, R, S>(
    State(usecase): State<Arc<BookingUseCase<B, C, R, S>>>,
    Json(body): Json<CreateBookingModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    R: CrmRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    info!(time_slot_id = %body.time_slot_id, "bookings: create request received");
    match usecase.create_booking(body).await {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn get_booking<B, C, R, S>(
    State(usecase): State<Arc<BookingUseCase<B, C, R, S>>>,
    auth_user: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    R: CrmRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.get_booking(&auth_user, booking_id).await {
        Ok(booking) => Json(booking).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn list_bookings<B, C, R, S>(
    State(usecase): State<Arc<BookingUseCase<B, C, R, S>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
    Query(filter): Query<BookingListFilter>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    R: CrmRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.list_bookings(&auth_user, business_id, filter).await {
        Ok(bookings) => Json(bookings).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn customer_booking_history<B, C, R, S>(
    State(usecase): State<Arc<BookingUseCase<B, C, R, S>>>,
    auth_user: AuthUser,
    Path(customer_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    R: CrmRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if limit <= 0 || limit > MAX_HISTORY_LIMIT {
        return (
            StatusCode::BAD_REQUEST,
            format!("limit must be between 1 and {}", MAX_HISTORY_LIMIT),
        )
            .into_response();
    }

    match usecase
        .customer_booking_history(&auth_user, customer_id, limit)
        .await
    {
        Ok(bookings) => Json(bookings).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn confirm_booking<B, C, R, S>(
    State(usecase): State<Arc<BookingUseCase<B, C, R, S>>>,
    auth_user: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    R: CrmRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.confirm_booking(&auth_user, booking_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn start_booking<B, C, R, S>(
    State(usecase): State<Arc<BookingUseCase<B, C, R, S>>>,
    auth_user: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    R: CrmRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.start_booking(&auth_user, booking_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn complete_booking<B, C, R, S>(
    State(usecase): State<Arc<BookingUseCase<B, C, R, S>>>,
    auth_user: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    R: CrmRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.complete_booking(&auth_user, booking_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn cancel_booking<B, C, R, S>(
    State(usecase): State<Arc<BookingUseCase<B, C, R, S>>>,
    auth_user: AuthUser,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<CancelBookingModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    R: CrmRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.cancel_booking(&auth_user, booking_id, body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn mark_no_show<B, C, R, S>(
    State(usecase): State<Arc<BookingUseCase<B, C, R, S>>>,
    auth_user: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    R: CrmRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.mark_no_show(&auth_user, booking_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}
