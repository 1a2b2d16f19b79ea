use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::AuthUser,
    application::usecases::identity::IdentityUseCase,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::users::UserRepository,
        value_objects::iam::{
            ConfirmPasswordResetModel, LoginModel, RegisterUserModel, RequestPasswordResetModel,
        },
    },
    infrastructure::{
        axum_http::error_responses,
        email::{EmailQueue, LogEmailSender},
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshBody {
    refresh_token: String,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let mailer = EmailQueue::new(Arc::new(LogEmailSender::new(
        config.email.from_address.clone(),
    )));
    let usecase = IdentityUseCase::new(
        Arc::new(user_repository),
        mailer,
        config.email.clone(),
    );

    Router::new()
        .route("/register", post(register))
        .route("/verify-email", get(verify_email))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(me))
        .route("/password-reset/request", post(request_password_reset))
        .route("/password-reset/confirm", post(confirm_password_reset))
        .with_state(Arc::new(usecase))
}

pub async fn register<T>(
    State(usecase): State<Arc<IdentityUseCase<T>>>,
    Json(body): Json<RegisterUserModel>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync + 'static,
{
    match usecase.register(body).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn verify_email<T>(
    State(usecase): State<Arc<IdentityUseCase<T>>>,
    Query(query): Query<VerifyEmailQuery>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync + 'static,
{
    match usecase.verify_email(&query.token).await {
        Ok(()) => (StatusCode::OK, "Email verified").into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn login<T>(
    State(usecase): State<Arc<IdentityUseCase<T>>>,
    Json(body): Json<LoginModel>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync + 'static,
{
    match usecase.login(body).await {
        Ok(pair) => Json(pair).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn refresh<T>(
    State(usecase): State<Arc<IdentityUseCase<T>>>,
    Json(body): Json<RefreshBody>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync + 'static,
{
    match usecase.refresh(&body.refresh_token).await {
        Ok(pair) => Json(pair).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn me<T>(
    State(usecase): State<Arc<IdentityUseCase<T>>>,
    auth_user: AuthUser,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync + 'static,
{
    info!(user_id = %auth_user.user_id, "identity: profile request received");
    match usecase.me(auth_user.user_id).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn request_password_reset<T>(
    State(usecase): State<Arc<IdentityUseCase<T>>>,
    Json(body): Json<RequestPasswordResetModel>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync + 'static,
{
    match usecase.request_password_reset(body).await {
        Ok(()) => (
            StatusCode::OK,
            "If the account exists, a reset mail has been sent",
        )
            .into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn confirm_password_reset<T>(
    State(usecase): State<Arc<IdentityUseCase<T>>>,
    Json(body): Json<ConfirmPasswordResetModel>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync + 'static,
{
    match usecase.confirm_password_reset(body).await {
        Ok(()) => (StatusCode::OK, "Password updated").into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}
