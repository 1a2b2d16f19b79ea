use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    application::usecases::crm::CrmUseCase,
    domain::{
        repositories::{catalog::CatalogRepository, crm::CrmRepository},
        value_objects::{
            crm::{
                CreateCommunicationModel, CreateCustomerModel, CreateLeadModel,
                UpdateLeadStatusModel,
            },
            enums::lead_statuses::LeadStatus,
        },
    },
    infrastructure::{
        axum_http::error_responses,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{catalog::CatalogPostgres, crm::CrmPostgres},
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct CustomersQuery {
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeadsQuery {
    status: Option<LeadStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CommunicationsQuery {
    customer_id: Option<Uuid>,
    lead_id: Option<Uuid>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let crm_repository = CrmPostgres::new(Arc::clone(&db_pool));
    let catalog_repository = CatalogPostgres::new(Arc::clone(&db_pool));
    let usecase = CrmUseCase::new(Arc::new(crm_repository), Arc::new(catalog_repository));

    Router::new()
        .route("/customers", post(create_customer))
        .route("/customers/:customer_id", get(get_customer))
        .route("/businesses/:business_id/customers", get(list_customers))
        .route("/leads", post(create_lead))
        .route("/leads/:lead_id/status", patch(update_lead_status))
        .route("/leads/:lead_id/convert", post(convert_lead))
        .route("/businesses/:business_id/leads", get(list_leads))
        .route("/communications", post(log_communication))
        .route(
            "/businesses/:business_id/communications",
            get(list_communications),
        )
        .with_state(Arc::new(usecase))
}

pub async fn create_customer<R, C>(
    State(usecase): State<Arc<CrmUseCase<R, C>>>,
    auth_user: AuthUser,
    Json(body): Json<CreateCustomerModel>,
) -> impl IntoResponse
where
    R: CrmRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.create_customer(&auth_user, body).await {
        Ok(customer_id) => {
            (StatusCode::CREATED, Json(json!({ "id": customer_id }))).into_response()
        }
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn get_customer<R, C>(
    State(usecase): State<Arc<CrmUseCase<R, C>>>,
    auth_user: AuthUser,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: CrmRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.get_customer(&auth_user, customer_id).await {
        Ok(customer) => Json(customer).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn list_customers<R, C>(
    State(usecase): State<Arc<CrmUseCase<R, C>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
    Query(query): Query<CustomersQuery>,
) -> impl IntoResponse
where
    R: CrmRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase
        .list_customers(&auth_user, business_id, query.search)
        .await
    {
        Ok(customers) => Json(customers).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn create_lead<R, C>(
    State(usecase): State<Arc<CrmUseCase<R, C>>>,
    auth_user: AuthUser,
    Json(body): Json<CreateLeadModel>,
) -> impl IntoResponse
where
    R: CrmRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.create_lead(&auth_user, body).await {
        Ok(lead_id) => (StatusCode::CREATED, Json(json!({ "id": lead_id }))).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn list_leads<R, C>(
    State(usecase): State<Arc<CrmUseCase<R, C>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
    Query(query): Query<LeadsQuery>,
) -> impl IntoResponse
where
    R: CrmRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.list_leads(&auth_user, business_id, query.status).await {
        Ok(leads) => Json(leads).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn update_lead_status<R, C>(
    State(usecase): State<Arc<CrmUseCase<R, C>>>,
    auth_user: AuthUser,
    Path(lead_id): Path<Uuid>,
    Json(body): Json<UpdateLeadStatusModel>,
) -> impl IntoResponse
where
    R: CrmRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.update_lead_status(&auth_user, lead_id, body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn convert_lead<R, C>(
    State(usecase): State<Arc<CrmUseCase<R, C>>>,
    auth_user: AuthUser,
    Path(lead_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: CrmRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.convert_lead(&auth_user, lead_id).await {
        Ok(customer_id) => Json(json!({ "customer_id": customer_id })).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn log_communication<R, C>(
    State(usecase): State<Arc<CrmUseCase<R, C>>>,
    auth_user: AuthUser,
    Json(body): Json<CreateCommunicationModel>,
) -> impl IntoResponse
where
    R: CrmRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase.log_communication(&auth_user, body).await {
        Ok(communication_id) => {
            (StatusCode::CREATED, Json(json!({ "id": communication_id }))).into_response()
        }
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}

pub async fn list_communications<R, C>(
    State(usecase): State<Arc<CrmUseCase<R, C>>>,
    auth_user: AuthUser,
    Path(business_id): Path<Uuid>,
    Query(query): Query<CommunicationsQuery>,
) -> impl IntoResponse
where
    R: CrmRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
{
    match usecase
        .list_communications(&auth_user, business_id, query.customer_id, query.lead_id)
        .await
    {
        Ok(communications) => Json(communications).into_response(),
        Err(err) => error_responses::respond(err.status_code(), err),
    }
}
