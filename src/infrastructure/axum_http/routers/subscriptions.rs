use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    application::usecases::subscriptions::SubscriptionUseCase,
    domain::{
        repositories::{catalog::CatalogRepository, subscriptions::SubscriptionRepository},
        value_objects::subscriptions::CancelSubscriptionModel,
    },
    infrastructure::{
        axum_http::error_responses,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{catalog::CatalogPostgres, subscriptions::SubscriptionPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let catalog_repository = CatalogPostgres::new(Arc::clone(&db_pool));
    let usecase = SubscriptionUseCase::new(
        Arc::new(subscription_repository),
        Arc::new(catalog_repository),
    );

    Router::new()
        .route("/plans", get(list_plans))
        .route("/businesses/:business_id/subscription", get(current))
        .route("/businesses/:business_id/subscription/usage", get(usage))
        .route(
            "/businesses/:business_id/subscription/cancel",
            post(cancel),
        )
        .with_state(Arc::new(usecase))
}

/// Public pricing page feed.
pub async fn list_plans<S, C>(
    State(usecase): State<Arc<SubscriptionUseCase<S, C>>>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.list_plans().await {
        Ok(plans) => Json(plans).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn current<S, C>(
    State(usecase): State<Arc<SubscriptionUseCase<S, C>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.current(&auth_user, business_id).await {
        Ok(subscription) => Json(subscription).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn usage<S, C>(
    State(usecase): State<Arc<SubscriptionUseCase<S, C>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.usage(&auth_user, business_id).await {
        Ok(usage) => Json(usage).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn cancel<S, C>(
    State(usecase): State<Arc<SubscriptionUseCase<S, C>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
    Json(body): Json<CancelSubscriptionModel>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.cancel(&auth_user, business_id, body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}
