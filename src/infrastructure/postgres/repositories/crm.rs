use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            communications::{CommunicationEntity, InsertCommunicationEntity},
            customers::{CustomerEntity, InsertCustomerEntity},
            leads::{InsertLeadEntity, LeadEntity},
        },
        repositories::crm::CrmRepository,
        value_objects::enums::lead_statuses::LeadStatus,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{communications, customers, leads},
    },
};

pub struct CrmPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CrmPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CrmRepository for CrmPostgres {
    async fn create_customer(&self, insert_customer_entity: InsertCustomerEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(customers::table)
            .values(&insert_customer_entity)
            .returning(customers::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_customer(&self, customer_id: Uuid) -> Result<Option<CustomerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = customers::table
            .find(customer_id)
            .first::<CustomerEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_customer_by_email(
        &self,
        business_id: Uuid,
        email: &str,
    ) -> Result<Option<CustomerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = customers::table
            .filter(customers::business_id.eq(business_id))
            .filter(customers::email.eq(email))
            .first::<CustomerEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_customers(
        &self,
        business_id: Uuid,
        search: Option<String>,
    ) -> Result<Vec<CustomerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = customers::table
            .filter(customers::business_id.eq(business_id))
            .into_boxed();

        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            query = query.filter(
                customers::first_name
                    .ilike(pattern.clone())
                    .or(customers::last_name.ilike(pattern.clone()))
                    .or(customers::email.ilike(pattern.clone()))
                    .or(customers::phone.ilike(pattern)),
            );
        }

        let results = query
            .order(customers::created_at.desc())
            .load::<CustomerEntity>(&mut conn)?;

        Ok(results)
    }

    async fn create_lead(&self, insert_lead_entity: InsertLeadEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(leads::table)
            .values(&insert_lead_entity)
            .returning(leads::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_lead(&self, lead_id: Uuid) -> Result<Option<LeadEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = leads::table
            .find(lead_id)
            .first::<LeadEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_leads(
        &self,
        business_id: Uuid,
        status: Option<String>,
    ) -> Result<Vec<LeadEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = leads::table
            .filter(leads::business_id.eq(business_id))
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(leads::status.eq(status));
        }

        let results = query
            .order(leads::created_at.desc())
            .load::<LeadEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_lead_status(&self, lead_id: Uuid, status: String) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(leads::table)
            .filter(leads::id.eq(lead_id))
            .set((leads::status.eq(status), leads::updated_at.eq(Utc::now())))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn convert_lead(
        &self,
        lead_id: Uuid,
        customer_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(leads::table)
            .filter(leads::id.eq(lead_id))
            .set((
                leads::status.eq(LeadStatus::Converted.to_string()),
                leads::converted_customer_id.eq(customer_id),
                leads::converted_at.eq(at),
                leads::updated_at.eq(at),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn create_communication(
        &self,
        insert_communication_entity: InsertCommunicationEntity,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(communications::table)
            .values(&insert_communication_entity)
            .returning(communications::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn list_communications(
        &self,
        business_id: Uuid,
        customer_id: Option<Uuid>,
        lead_id: Option<Uuid>,
    ) -> Result<Vec<CommunicationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = communications::table
            .filter(communications::business_id.eq(business_id))
            .into_boxed();

        if let Some(customer_id) = customer_id {
            query = query.filter(communications::customer_id.eq(customer_id));
        }

        if let Some(lead_id) = lead_id {
            query = query.filter(communications::lead_id.eq(lead_id));
        }

        let results = query
            .order(communications::created_at.desc())
            .load::<CommunicationEntity>(&mut conn)?;

        Ok(results)
    }
}
