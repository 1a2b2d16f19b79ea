use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::bookings::BookingEntity;

#[automock]
#[async_trait]
pub trait DashboardRepository {
    async fn count_bookings_between(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64>;
    /// Revenue counts only bookings whose payment_status is PAID.
    async fn revenue_between(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64>;
    async fn count_pending_on(&self, business_id: Uuid, date: NaiveDate) -> Result<i64>;
    async fn count_new_customers_since(&self, business_id: Uuid, since: NaiveDate) -> Result<i64>;
    async fn upcoming_bookings(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<BookingEntity>>;
    async fn booking_dates_between(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>>;
    async fn top_services(&self, business_id: Uuid, limit: i64)
        -> Result<Vec<(Uuid, String, i64)>>;
    async fn bookings_with_service_names(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(BookingEntity, String)>>;

    /// Client-side views join through the customer records linked to the
    /// user account, across every business the user books with.
    async fn client_upcoming_bookings(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<BookingEntity>>;
    async fn client_booking_counts(&self, user_id: Uuid) -> Result<(i64, i64)>;
}
