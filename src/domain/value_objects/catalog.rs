use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{
    businesses::{BusinessEntity, BusinessStaffEntity, InsertBusinessEntity,
        InsertBusinessStaffEntity},
    services::{InsertServiceEntity, ServiceEntity, UpdateServiceEntity},
    time_slots::{InsertTimeSlotEntity, TimeSlotEntity},
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBusinessModel {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub plan_slug: String,
}

impl CreateBusinessModel {
    pub fn to_entity(&self, owner_id: Uuid) -> InsertBusinessEntity {
        InsertBusinessEntity {
            owner_id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessModel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub slug: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<BusinessEntity> for BusinessModel {
    fn from(entity: BusinessEntity) -> Self {
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            name: entity.name,
            slug: entity.slug,
            phone: entity.phone,
            address: entity.address,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddStaffModel {
    pub user_id: Uuid,
    #[serde(default)]
    pub title: String,
}

impl AddStaffModel {
    pub fn to_entity(&self, business_id: Uuid) -> InsertBusinessStaffEntity {
        InsertBusinessStaffEntity {
            business_id,
            user_id: self.user_id,
            title: self.title.clone(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffModel {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub is_active: bool,
}

impl From<BusinessStaffEntity> for StaffModel {
    fn from(entity: BusinessStaffEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            user_id: entity.user_id,
            title: entity.title,
            is_active: entity.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceModel {
    pub business_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: i32,
    pub price_minor: i32,
    pub discounted_price_minor: Option<i32>,
    #[serde(default = "default_max_bookings_per_slot")]
    pub max_bookings_per_slot: i32,
}

fn default_max_bookings_per_slot() -> i32 {
    1
}

impl CreateServiceModel {
    pub fn to_entity(&self) -> InsertServiceEntity {
        InsertServiceEntity {
            business_id: self.business_id,
            name: self.name.clone(),
            description: self.description.clone(),
            duration_minutes: self.duration_minutes,
            price_minor: self.price_minor,
            discounted_price_minor: self.discounted_price_minor,
            max_bookings_per_slot: self.max_bookings_per_slot,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateServiceModel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price_minor: Option<i32>,
    pub discounted_price_minor: Option<Option<i32>>,
    pub max_bookings_per_slot: Option<i32>,
    pub is_active: Option<bool>,
}

impl UpdateServiceModel {
    pub fn to_entity(&self) -> UpdateServiceEntity {
        UpdateServiceEntity {
            name: self.name.clone(),
            description: self.description.clone(),
            duration_minutes: self.duration_minutes,
            price_minor: self.price_minor,
            discounted_price_minor: self.discounted_price_minor,
            max_bookings_per_slot: self.max_bookings_per_slot,
            is_active: self.is_active,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceModel {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: String,
    pub duration_minutes: i32,
    pub price_minor: i32,
    pub discounted_price_minor: Option<i32>,
    pub max_bookings_per_slot: i32,
    pub is_active: bool,
}

impl From<ServiceEntity> for ServiceModel {
    fn from(entity: ServiceEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            name: entity.name,
            description: entity.description,
            duration_minutes: entity.duration_minutes,
            price_minor: entity.price_minor,
            discounted_price_minor: entity.discounted_price_minor,
            max_bookings_per_slot: entity.max_bookings_per_slot,
            is_active: entity.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotWindowModel {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimeSlotsModel {
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub windows: Vec<SlotWindowModel>,
    pub max_bookings: i32,
}

impl CreateTimeSlotsModel {
    pub fn to_entities(&self, business_id: Uuid) -> Vec<InsertTimeSlotEntity> {
        self.windows
            .iter()
            .map(|window| InsertTimeSlotEntity {
                business_id,
                service_id: self.service_id,
                staff_id: self.staff_id,
                date: self.date,
                start_time: window.start_time,
                end_time: window.end_time,
                is_available: true,
                max_bookings: self.max_bookings,
                current_bookings: 0,
                created_at: Utc::now(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSlotModel {
    pub id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub max_bookings: i32,
    pub current_bookings: i32,
    pub is_bookable: bool,
}

impl From<TimeSlotEntity> for TimeSlotModel {
    fn from(entity: TimeSlotEntity) -> Self {
        let is_bookable = entity.is_bookable();
        Self {
            id: entity.id,
            service_id: entity.service_id,
            staff_id: entity.staff_id,
            date: entity.date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            is_available: entity.is_available,
            max_bookings: entity.max_bookings,
            current_bookings: entity.current_bookings,
            is_bookable,
        }
    }
}
