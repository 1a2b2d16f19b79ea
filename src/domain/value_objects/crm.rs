use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        communications::{CommunicationEntity, InsertCommunicationEntity},
        customers::{CustomerEntity, InsertCustomerEntity},
        leads::{InsertLeadEntity, LeadEntity},
    },
    value_objects::enums::{
        communication_types::CommunicationType, lead_sources::LeadSource, lead_statuses::LeadStatus,
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerModel {
    pub business_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

impl CreateCustomerModel {
    pub fn to_entity(&self) -> InsertCustomerEntity {
        InsertCustomerEntity {
            business_id: self.business_id,
            user_id: None,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.clone(),
            notes: self.notes.clone(),
            total_bookings: 0,
            total_spent_minor: 0,
            no_show_count: 0,
            cancellation_count: 0,
            first_visit: None,
            last_visit: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerModel {
    pub id: Uuid,
    pub business_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub total_bookings: i32,
    pub total_spent_minor: i32,
    pub no_show_count: i32,
    pub cancellation_count: i32,
    pub first_visit: Option<DateTime<Utc>>,
    pub last_visit: Option<DateTime<Utc>>,
}

impl From<CustomerEntity> for CustomerModel {
    fn from(entity: CustomerEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            phone: entity.phone,
            total_bookings: entity.total_bookings,
            total_spent_minor: entity.total_spent_minor,
            no_show_count: entity.no_show_count,
            cancellation_count: entity.cancellation_count,
            first_visit: entity.first_visit,
            last_visit: entity.last_visit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLeadModel {
    pub business_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub source: LeadSource,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub estimated_value_minor: i32,
}

impl CreateLeadModel {
    pub fn to_entity(&self) -> InsertLeadEntity {
        InsertLeadEntity {
            business_id: self.business_id,
            name: self.name.clone(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            status: LeadStatus::New.to_string(),
            source: self.source.to_string(),
            notes: self.notes.clone(),
            estimated_value_minor: self.estimated_value_minor,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLeadStatusModel {
    pub status: LeadStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadModel {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: LeadStatus,
    pub source: LeadSource,
    pub estimated_value_minor: i32,
    pub converted_at: Option<DateTime<Utc>>,
    pub converted_customer_id: Option<Uuid>,
}

impl From<LeadEntity> for LeadModel {
    fn from(entity: LeadEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            company: entity.company,
            status: LeadStatus::from_str(&entity.status),
            source: LeadSource::from_str(&entity.source),
            estimated_value_minor: entity.estimated_value_minor,
            converted_at: entity.converted_at,
            converted_customer_id: entity.converted_customer_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommunicationModel {
    pub business_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub r#type: CommunicationType,
    pub subject: String,
    pub content: String,
}

impl CreateCommunicationModel {
    pub fn to_entity(&self, created_by: Uuid) -> InsertCommunicationEntity {
        InsertCommunicationEntity {
            business_id: self.business_id,
            customer_id: self.customer_id,
            lead_id: self.lead_id,
            type_: self.r#type.to_string(),
            subject: self.subject.clone(),
            content: self.content.clone(),
            created_by: Some(created_by),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunicationModel {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub r#type: CommunicationType,
    pub subject: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommunicationEntity> for CommunicationModel {
    fn from(entity: CommunicationEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            customer_id: entity.customer_id,
            lead_id: entity.lead_id,
            r#type: CommunicationType::from_str(&entity.type_),
            subject: entity.subject,
            content: entity.content,
            created_at: entity.created_at,
        }
    }
}
