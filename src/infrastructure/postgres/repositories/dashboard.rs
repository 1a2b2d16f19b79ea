use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::{count, sum};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::bookings::BookingEntity,
        repositories::dashboard::DashboardRepository,
        value_objects::enums::{
            booking_statuses::BookingStatus, payment_statuses::PaymentStatus,
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{bookings, customers, services},
    },
};

pub struct DashboardPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DashboardPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn upcoming_statuses() -> Vec<String> {
    vec![
        BookingStatus::Pending.to_string(),
        BookingStatus::Confirmed.to_string(),
    ]
}

#[async_trait]
impl DashboardRepository for DashboardPostgres {
    async fn count_bookings_between(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .filter(bookings::business_id.eq(business_id))
            .filter(bookings::date.ge(from))
            .filter(bookings::date.le(to))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(result)
    }

    async fn revenue_between(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .filter(bookings::business_id.eq(business_id))
            .filter(bookings::payment_status.eq(PaymentStatus::Paid.to_string()))
            .filter(bookings::date.ge(from))
            .filter(bookings::date.le(to))
            .select(sum(bookings::total_amount_minor))
            .get_result::<Option<i64>>(&mut conn)?;

        Ok(result.unwrap_or(0))
    }

    async fn count_pending_on(&self, business_id: Uuid, date: NaiveDate) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .filter(bookings::business_id.eq(business_id))
            .filter(bookings::date.eq(date))
            .filter(bookings::status.eq(BookingStatus::Pending.to_string()))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(result)
    }

    async fn count_new_customers_since(&self, business_id: Uuid, since: NaiveDate) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let since_start = since.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
        let result = customers::table
            .filter(customers::business_id.eq(business_id))
            .filter(customers::created_at.ge(since_start))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(result)
    }

    async fn upcoming_bookings(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bookings::table
            .filter(bookings::business_id.eq(business_id))
            .filter(bookings::date.ge(from))
            .filter(bookings::status.eq_any(upcoming_statuses()))
            .order((bookings::date.asc(), bookings::start_time.asc()))
            .limit(limit)
            .load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn booking_dates_between(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bookings::table
            .filter(bookings::business_id.eq(business_id))
            .filter(bookings::date.ge(from))
            .filter(bookings::date.le(to))
            .select(bookings::date)
            .load::<NaiveDate>(&mut conn)?;

        Ok(results)
    }

    async fn top_services(
        &self,
        business_id: Uuid,
        limit: i64,
    ) -> Result<Vec<(Uuid, String, i64)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bookings::table
            .inner_join(services::table)
            .filter(bookings::business_id.eq(business_id))
            .group_by((services::id, services::name))
            .select((services::id, services::name, count(bookings::id)))
            .order(count(bookings::id).desc())
            .limit(limit)
            .load::<(Uuid, String, i64)>(&mut conn)?;

        Ok(results)
    }

    async fn bookings_with_service_names(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(BookingEntity, String)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bookings::table
            .inner_join(services::table)
            .filter(bookings::business_id.eq(business_id))
            .filter(bookings::date.ge(from))
            .filter(bookings::date.le(to))
            .select((BookingEntity::as_select(), services::name))
            .order((bookings::date.asc(), bookings::start_time.asc()))
            .load::<(BookingEntity, String)>(&mut conn)?;

        Ok(results)
    }

    async fn client_upcoming_bookings(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bookings::table
            .inner_join(customers::table.on(bookings::customer_id.eq(customers::id)))
            .filter(customers::user_id.eq(user_id))
            .filter(bookings::date.ge(from))
            .filter(bookings::status.eq_any(upcoming_statuses()))
            .order((bookings::date.asc(), bookings::start_time.asc()))
            .limit(limit)
            .select(BookingEntity::as_select())
            .load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn client_booking_counts(&self, user_id: Uuid) -> Result<(i64, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = bookings::table
            .inner_join(customers::table.on(bookings::customer_id.eq(customers::id)))
            .filter(customers::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        let completed = bookings::table
            .inner_join(customers::table.on(bookings::customer_id.eq(customers::id)))
            .filter(customers::user_id.eq(user_id))
            .filter(bookings::status.eq(BookingStatus::Completed.to_string()))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok((completed, total))
    }
}
