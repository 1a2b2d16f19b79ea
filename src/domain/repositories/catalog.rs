use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    businesses::{BusinessEntity, BusinessStaffEntity, InsertBusinessEntity,
        InsertBusinessStaffEntity},
    services::{InsertServiceEntity, ServiceEntity, UpdateServiceEntity},
    time_slots::{InsertTimeSlotEntity, TimeSlotEntity},
};

#[automock]
#[async_trait]
pub trait CatalogRepository {
    async fn create_business(&self, insert_business_entity: InsertBusinessEntity) -> Result<Uuid>;
    async fn find_business(&self, business_id: Uuid) -> Result<Option<BusinessEntity>>;
    async fn list_businesses_by_owner(&self, owner_id: Uuid) -> Result<Vec<BusinessEntity>>;
    /// Deletes the business and everything it owns: staff, services, slots,
    /// bookings, customers, leads, and communications.
    async fn delete_business(&self, business_id: Uuid) -> Result<()>;

    async fn add_staff(&self, insert_staff_entity: InsertBusinessStaffEntity) -> Result<Uuid>;
    async fn list_staff(&self, business_id: Uuid) -> Result<Vec<BusinessStaffEntity>>;
    async fn count_active_staff(&self, business_id: Uuid) -> Result<i64>;

    async fn create_service(&self, insert_service_entity: InsertServiceEntity) -> Result<Uuid>;
    async fn update_service(
        &self,
        service_id: Uuid,
        update_service_entity: UpdateServiceEntity,
    ) -> Result<()>;
    async fn find_service(&self, service_id: Uuid) -> Result<Option<ServiceEntity>>;
    async fn list_services(&self, business_id: Uuid) -> Result<Vec<ServiceEntity>>;
    async fn count_active_services(&self, business_id: Uuid) -> Result<i64>;

    async fn create_time_slots(&self, slots: Vec<InsertTimeSlotEntity>) -> Result<usize>;
    async fn find_time_slot(&self, slot_id: Uuid) -> Result<Option<TimeSlotEntity>>;
    async fn list_open_slots(&self, service_id: Uuid, date: NaiveDate)
        -> Result<Vec<TimeSlotEntity>>;
}
