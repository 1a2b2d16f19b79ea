use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    communications::{CommunicationEntity, InsertCommunicationEntity},
    customers::{CustomerEntity, InsertCustomerEntity},
    leads::{InsertLeadEntity, LeadEntity},
};

#[automock]
#[async_trait]
pub trait CrmRepository {
    async fn create_customer(&self, insert_customer_entity: InsertCustomerEntity) -> Result<Uuid>;
    async fn find_customer(&self, customer_id: Uuid) -> Result<Option<CustomerEntity>>;
    async fn find_customer_by_email(
        &self,
        business_id: Uuid,
        email: &str,
    ) -> Result<Option<CustomerEntity>>;
    async fn list_customers(
        &self,
        business_id: Uuid,
        search: Option<String>,
    ) -> Result<Vec<CustomerEntity>>;

    async fn create_lead(&self, insert_lead_entity: InsertLeadEntity) -> Result<Uuid>;
    async fn find_lead(&self, lead_id: Uuid) -> Result<Option<LeadEntity>>;
    async fn list_leads(&self, business_id: Uuid, status: Option<String>)
        -> Result<Vec<LeadEntity>>;
    async fn update_lead_status(&self, lead_id: Uuid, status: String) -> Result<()>;
    /// Links the lead to its customer and stamps the conversion in one
    /// update, so CONVERTED always carries a customer reference.
    async fn convert_lead(
        &self,
        lead_id: Uuid,
        customer_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<()>;

    async fn create_communication(
        &self,
        insert_communication_entity: InsertCommunicationEntity,
    ) -> Result<Uuid>;
    async fn list_communications(
        &self,
        business_id: Uuid,
        customer_id: Option<Uuid>,
        lead_id: Option<Uuid>,
    ) -> Result<Vec<CommunicationEntity>>;
}
