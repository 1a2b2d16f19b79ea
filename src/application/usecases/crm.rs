use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Resource, can_access},
    domain::{
        entities::customers::InsertCustomerEntity,
        repositories::{catalog::CatalogRepository, crm::CrmRepository},
        value_objects::{
            crm::{
                CommunicationModel, CreateCommunicationModel, CreateCustomerModel,
                CreateLeadModel, CustomerModel, LeadModel, UpdateLeadStatusModel,
            },
            enums::lead_statuses::LeadStatus,
        },
    },
};

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("business not found")]
    BusinessNotFound,
    #[error("customer not found")]
    CustomerNotFound,
    #[error("lead not found")]
    LeadNotFound,
    #[error("a customer with this email already exists")]
    DuplicateCustomer,
    #[error("lead is already {0}")]
    LeadClosed(LeadStatus),
    #[error("leads become CONVERTED through conversion, not a status update")]
    DirectConversion,
    #[error("a communication must reference a customer or a lead")]
    MissingTarget,
    #[error("not allowed to access this business")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CrmError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CrmError::BusinessNotFound | CrmError::CustomerNotFound | CrmError::LeadNotFound => {
                StatusCode::NOT_FOUND
            }
            CrmError::DuplicateCustomer | CrmError::LeadClosed(_) => StatusCode::CONFLICT,
            CrmError::DirectConversion | CrmError::MissingTarget => StatusCode::BAD_REQUEST,
            CrmError::Forbidden => StatusCode::FORBIDDEN,
            CrmError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CrmError>;

pub struct CrmUseCase<R, C>
where
    R: CrmRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
{
    crm_repo: Arc<R>,
    catalog_repo: Arc<C>,
}

impl<R, C> CrmUseCase<R, C>
where
    R: CrmRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
{
    pub fn new(crm_repo: Arc<R>, catalog_repo: Arc<C>) -> Self {
        Self {
            crm_repo,
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
            .map_err(CrmError::Internal)?
            .ok_or(CrmError::BusinessNotFound)?;

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
            .map_err(CrmError::Internal)?;
        let is_active_staff = staff
            .iter()
            .any(|member| member.user_id == auth_user.user_id && member.is_active);
        if can_access(auth_user, operations(is_active_staff)) {
            return Ok(());
        }

        warn!(
            %business_id,
            user_id = %auth_user.user_id,
            "crm: rejected non-member access"
        );
        Err(CrmError::Forbidden)
    }

    pub async fn create_customer(
        &self,
        auth_user: &AuthUser,
        create_model: CreateCustomerModel,
    ) -> UseCaseResult<Uuid> {
        self.ensure_business_member(create_model.business_id, auth_user)
            .await?;

        let email = create_model.email.trim().to_lowercase();
        let existing = self
            .crm_repo
            .find_customer_by_email(create_model.business_id, &email)
            .await
            .map_err(CrmError::Internal)?;
        if existing.is_some() {
            return Err(CrmError::DuplicateCustomer);
        }

        let customer_id = self
            .crm_repo
            .create_customer(create_model.to_entity())
            .await
            .map_err(CrmError::Internal)?;

        info!(business_id = %create_model.business_id, %customer_id, "crm: customer created");
        Ok(customer_id)
    }

    pub async fn get_customer(
        &self,
        auth_user: &AuthUser,
        customer_id: Uuid,
    ) -> UseCaseResult<CustomerModel> {
        let customer = self
            .crm_repo
            .find_customer(customer_id)
            .await
            .map_err(CrmError::Internal)?
            .ok_or(CrmError::CustomerNotFound)?;
        self.ensure_business_member(customer.business_id, auth_user)
            .await?;
        Ok(CustomerModel::from(customer))
    }

    pub async fn list_customers(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
        search: Option<String>,
    ) -> UseCaseResult<Vec<CustomerModel>> {
        self.ensure_business_member(business_id, auth_user).await?;

        let customers = self
            .crm_repo
            .list_customers(business_id, search)
            .await
            .map_err(CrmError::Internal)?;
        Ok(customers.into_iter().map(CustomerModel::from).collect())
    }

    pub async fn create_lead(
        &self,
        auth_user: &AuthUser,
        create_model: CreateLeadModel,
    ) -> UseCaseResult<Uuid> {
        self.ensure_business_member(create_model.business_id, auth_user)
            .await?;

        let lead_id = self
            .crm_repo
            .create_lead(create_model.to_entity())
            .await
            .map_err(CrmError::Internal)?;

        info!(business_id = %create_model.business_id, %lead_id, "crm: lead created");
        Ok(lead_id)
    }

    pub async fn list_leads(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
        status: Option<LeadStatus>,
    ) -> UseCaseResult<Vec<LeadModel>> {
        self.ensure_business_member(business_id, auth_user).await?;

        let leads = self
            .crm_repo
            .list_leads(business_id, status.map(|s| s.to_string()))
            .await
            .map_err(CrmError::Internal)?;
        Ok(leads.into_iter().map(LeadModel::from).collect())
    }

    pub async fn update_lead_status(
        &self,
        auth_user: &AuthUser,
        lead_id: Uuid,
        update_model: UpdateLeadStatusModel,
    ) -> UseCaseResult<()> {
        if update_model.status == LeadStatus::Converted {
            return Err(CrmError::DirectConversion);
        }

        let lead = self
            .crm_repo
            .find_lead(lead_id)
            .await
            .map_err(CrmError::Internal)?
            .ok_or(CrmError::LeadNotFound)?;
        self.ensure_business_member(lead.business_id, auth_user)
            .await?;

        let current = LeadStatus::from_str(&lead.status);
        if current.is_terminal() {
            return Err(CrmError::LeadClosed(current));
        }

        self.crm_repo
            .update_lead_status(lead_id, update_model.status.to_string())
            .await
            .map_err(CrmError::Internal)?;

        info!(%lead_id, status = %update_model.status, "crm: lead status updated");
        Ok(())
    }

    /// Conversion creates (or reuses) the customer record and closes the
    /// lead as CONVERTED with a link to it.
    pub async fn convert_lead(
        &self,
        auth_user: &AuthUser,
        lead_id: Uuid,
    ) -> UseCaseResult<Uuid> {
        let lead = self
            .crm_repo
            .find_lead(lead_id)
            .await
            .map_err(CrmError::Internal)?
            .ok_or(CrmError::LeadNotFound)?;
        self.ensure_business_member(lead.business_id, auth_user)
            .await?;

        let current = LeadStatus::from_str(&lead.status);
        if current.is_terminal() {
            return Err(CrmError::LeadClosed(current));
        }

        let customer_id = match self
            .crm_repo
            .find_customer_by_email(lead.business_id, &lead.email)
            .await
            .map_err(CrmError::Internal)?
        {
            Some(customer) => customer.id,
            None => {
                let (first_name, last_name) = match lead.name.trim().split_once(' ') {
                    Some((first, last)) => (first.to_string(), last.trim().to_string()),
                    None => (lead.name.trim().to_string(), String::new()),
                };
                let now = Utc::now();
                self.crm_repo
                    .create_customer(InsertCustomerEntity {
                        business_id: lead.business_id,
                        user_id: None,
                        first_name,
                        last_name,
                        email: lead.email.clone(),
                        phone: lead.phone.clone(),
                        notes: lead.notes.clone(),
                        total_bookings: 0,
                        total_spent_minor: 0,
                        no_show_count: 0,
                        cancellation_count: 0,
                        first_visit: None,
                        last_visit: None,
                        created_at: now,
                        updated_at: now,
                    })
                    .await
                    .map_err(CrmError::Internal)?
            }
        };

        self.crm_repo
            .convert_lead(lead_id, customer_id, Utc::now())
            .await
            .map_err(CrmError::Internal)?;

        info!(%lead_id, %customer_id, "crm: lead converted");
        Ok(customer_id)
    }

    pub async fn log_communication(
        &self,
        auth_user: &AuthUser,
        create_model: CreateCommunicationModel,
    ) -> UseCaseResult<Uuid> {
        self.ensure_business_member(create_model.business_id, auth_user)
            .await?;

        if create_model.customer_id.is_none() && create_model.lead_id.is_none() {
            return Err(CrmError::MissingTarget);
        }

        let communication_id = self
            .crm_repo
            .create_communication(create_model.to_entity(auth_user.user_id))
            .await
            .map_err(CrmError::Internal)?;

        info!(
            business_id = %create_model.business_id,
            %communication_id,
            "crm: communication logged"
        );
        Ok(communication_id)
    }

    pub async fn list_communications(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
        customer_id: Option<Uuid>,
        lead_id: Option<Uuid>,
    ) -> UseCaseResult<Vec<CommunicationModel>> {
        self.ensure_business_member(business_id, auth_user).await?;

        let communications = self
            .crm_repo
            .list_communications(business_id, customer_id, lead_id)
            .await
            .map_err(CrmError::Internal)?;
        Ok(communications
            .into_iter()
            .map(CommunicationModel::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::user_roles::UserRole;
    use crate::domain::{
        entities::{businesses::BusinessEntity, customers::CustomerEntity, leads::LeadEntity},
        repositories::{catalog::MockCatalogRepository, crm::MockCrmRepository},
        value_objects::enums::{communication_types::CommunicationType, lead_sources::LeadSource},
    };

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

    fn lead(business_id: Uuid, status: LeadStatus) -> LeadEntity {
        LeadEntity {
            id: Uuid::new_v4(),
            business_id,
            name: "Sam Lee".to_string(),
            email: "sam@example.com".to_string(),
            phone: String::new(),
            company: String::new(),
            status: status.to_string(),
            source: LeadSource::Website.to_string(),
            notes: String::new(),
            estimated_value_minor: 0,
            converted_at: None,
            converted_customer_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_customer_rejects_duplicate_email() {
        let owner_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();

        let mut crm = MockCrmRepository::new();
        crm.expect_find_customer_by_email().returning(move |_, _| {
            Ok(Some(CustomerEntity {
                id: Uuid::new_v4(),
                business_id,
                user_id: None,
                first_name: "Jo".to_string(),
                last_name: "Doe".to_string(),
                email: "jo@example.com".to_string(),
                phone: String::new(),
                notes: String::new(),
                total_bookings: 0,
                total_spent_minor: 0,
                no_show_count: 0,
                cancellation_count: 0,
                first_visit: None,
                last_visit: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });

        let usecase = CrmUseCase::new(
            Arc::new(crm),
            Arc::new(catalog_with_business(business_id, owner_id)),
        );
        let result = usecase
            .create_customer(
                &owner(owner_id),
                CreateCustomerModel {
                    business_id,
                    first_name: "Jo".to_string(),
                    last_name: "Doe".to_string(),
                    email: "JO@example.com".to_string(),
                    phone: String::new(),
                    notes: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(CrmError::DuplicateCustomer)));
    }

    #[tokio::test]
    async fn update_lead_status_rejects_direct_conversion() {
        let usecase = CrmUseCase::new(
            Arc::new(MockCrmRepository::new()),
            Arc::new(MockCatalogRepository::new()),
        );
        let result = usecase
            .update_lead_status(
                &owner(Uuid::new_v4()),
                Uuid::new_v4(),
                UpdateLeadStatusModel {
                    status: LeadStatus::Converted,
                },
            )
            .await;

        assert!(matches!(result, Err(CrmError::DirectConversion)));
    }

    #[tokio::test]
    async fn update_lead_status_rejects_closed_lead() {
        let owner_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();

        let mut crm = MockCrmRepository::new();
        crm.expect_find_lead()
            .returning(move |_| Ok(Some(lead(business_id, LeadStatus::Lost))));

        let usecase = CrmUseCase::new(
            Arc::new(crm),
            Arc::new(catalog_with_business(business_id, owner_id)),
        );
        let result = usecase
            .update_lead_status(
                &owner(owner_id),
                Uuid::new_v4(),
                UpdateLeadStatusModel {
                    status: LeadStatus::Contacted,
                },
            )
            .await;

        assert!(matches!(result, Err(CrmError::LeadClosed(LeadStatus::Lost))));
    }

    #[tokio::test]
    async fn convert_lead_reuses_existing_customer() {
        let owner_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();
        let existing_customer_id = Uuid::new_v4();

        let mut crm = MockCrmRepository::new();
        crm.expect_find_lead()
            .returning(move |_| Ok(Some(lead(business_id, LeadStatus::Qualified))));
        crm.expect_find_customer_by_email().returning(move |_, _| {
            Ok(Some(CustomerEntity {
                id: existing_customer_id,
                business_id,
                user_id: None,
                first_name: "Sam".to_string(),
                last_name: "Lee".to_string(),
                email: "sam@example.com".to_string(),
                phone: String::new(),
                notes: String::new(),
                total_bookings: 2,
                total_spent_minor: 6000,
                no_show_count: 0,
                cancellation_count: 0,
                first_visit: None,
                last_visit: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });
        crm.expect_convert_lead()
            .withf(move |_, customer_id, _| *customer_id == existing_customer_id)
            .returning(|_, _, _| Ok(()));

        let usecase = CrmUseCase::new(
            Arc::new(crm),
            Arc::new(catalog_with_business(business_id, owner_id)),
        );
        let customer_id = usecase
            .convert_lead(&owner(owner_id), Uuid::new_v4())
            .await
            .expect("conversion should succeed");

        assert_eq!(customer_id, existing_customer_id);
    }

    #[tokio::test]
    async fn communication_requires_a_target() {
        let owner_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();

        let usecase = CrmUseCase::new(
            Arc::new(MockCrmRepository::new()),
            Arc::new(catalog_with_business(business_id, owner_id)),
        );
        let result = usecase
            .log_communication(
                &owner(owner_id),
                CreateCommunicationModel {
                    business_id,
                    customer_id: None,
                    lead_id: None,
                    r#type: CommunicationType::Note,
                    subject: "Call notes".to_string(),
                    content: "Spoke about availability".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(CrmError::MissingTarget)));
    }
}
