use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{Connection, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            businesses::{
                BusinessEntity, BusinessStaffEntity, InsertBusinessEntity,
                InsertBusinessStaffEntity,
            },
            services::{InsertServiceEntity, ServiceEntity, UpdateServiceEntity},
            time_slots::{InsertTimeSlotEntity, TimeSlotEntity},
        },
        repositories::catalog::CatalogRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{
            bookings, business_staff, businesses, communications, customers, leads, services,
            subscriptions, time_slots,
        },
    },
};

pub struct CatalogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CatalogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CatalogRepository for CatalogPostgres {
    async fn create_business(&self, insert_business_entity: InsertBusinessEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(businesses::table)
            .values(&insert_business_entity)
            .returning(businesses::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_business(&self, business_id: Uuid) -> Result<Option<BusinessEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = businesses::table
            .find(business_id)
            .first::<BusinessEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_businesses_by_owner(&self, owner_id: Uuid) -> Result<Vec<BusinessEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = businesses::table
            .filter(businesses::owner_id.eq(owner_id))
            .order(businesses::created_at.asc())
            .load::<BusinessEntity>(&mut conn)?;

        Ok(results)
    }

    async fn delete_business(&self, business_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Child rows first, in dependency order.
        conn.transaction::<(), diesel::result::Error, _>(|tx| {
            delete(communications::table.filter(communications::business_id.eq(business_id)))
                .execute(tx)?;
            delete(bookings::table.filter(bookings::business_id.eq(business_id))).execute(tx)?;
            delete(leads::table.filter(leads::business_id.eq(business_id))).execute(tx)?;
            delete(customers::table.filter(customers::business_id.eq(business_id))).execute(tx)?;
            delete(time_slots::table.filter(time_slots::business_id.eq(business_id)))
                .execute(tx)?;
            delete(services::table.filter(services::business_id.eq(business_id))).execute(tx)?;
            delete(business_staff::table.filter(business_staff::business_id.eq(business_id)))
                .execute(tx)?;
            delete(subscriptions::table.filter(subscriptions::business_id.eq(business_id)))
                .execute(tx)?;
            delete(businesses::table.find(business_id)).execute(tx)?;
            Ok(())
        })?;

        Ok(())
    }

    async fn add_staff(&self, insert_staff_entity: InsertBusinessStaffEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(business_staff::table)
            .values(&insert_staff_entity)
            .returning(business_staff::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn list_staff(&self, business_id: Uuid) -> Result<Vec<BusinessStaffEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = business_staff::table
            .filter(business_staff::business_id.eq(business_id))
            .order(business_staff::created_at.asc())
            .load::<BusinessStaffEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_active_staff(&self, business_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = business_staff::table
            .filter(business_staff::business_id.eq(business_id))
            .filter(business_staff::is_active.eq(true))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(result)
    }

    async fn create_service(&self, insert_service_entity: InsertServiceEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(services::table)
            .values(&insert_service_entity)
            .returning(services::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn update_service(
        &self,
        service_id: Uuid,
        update_service_entity: UpdateServiceEntity,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(services::table)
            .filter(services::id.eq(service_id))
            .set(&update_service_entity)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn find_service(&self, service_id: Uuid) -> Result<Option<ServiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = services::table
            .find(service_id)
            .first::<ServiceEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_services(&self, business_id: Uuid) -> Result<Vec<ServiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = services::table
            .filter(services::business_id.eq(business_id))
            .order(services::created_at.asc())
            .load::<ServiceEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_active_services(&self, business_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = services::table
            .filter(services::business_id.eq(business_id))
            .filter(services::is_active.eq(true))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(result)
    }

    async fn create_time_slots(&self, slots: Vec<InsertTimeSlotEntity>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(time_slots::table)
            .values(&slots)
            .execute(&mut conn)?;

        Ok(result)
    }

    async fn find_time_slot(&self, slot_id: Uuid) -> Result<Option<TimeSlotEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = time_slots::table
            .find(slot_id)
            .first::<TimeSlotEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_open_slots(
        &self,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlotEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = time_slots::table
            .filter(time_slots::service_id.eq(service_id))
            .filter(time_slots::date.eq(date))
            .filter(time_slots::is_available.eq(true))
            .filter(time_slots::current_bookings.lt(time_slots::max_bookings))
            .order(time_slots::start_time.asc())
            .load::<TimeSlotEntity>(&mut conn)?;

        Ok(results)
    }
}
