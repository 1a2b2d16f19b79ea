use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Resource, can_access},
    domain::{
        entities::{
            bookings::{BookingEntity, InsertBookingEntity},
            customers::InsertCustomerEntity,
        },
        repositories::{
            bookings::{BookingConflict, BookingRepository, CancelBookingArgs},
            catalog::CatalogRepository,
            crm::CrmRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::{
            bookings::{
                BookingListFilter, BookingModel, CancelBookingModel, CreateBookingModel,
                calculate_total_minor, generate_booking_number,
            },
            enums::{booking_statuses::BookingStatus, payment_statuses::PaymentStatus},
            subscriptions::can_add_booking,
        },
    },
    infrastructure::email::{self, EmailQueue},
};

/// Collisions on the 4-digit suffix are rare but real on busy days; each
/// retry regenerates the suffix.
const BOOKING_NUMBER_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("time slot not found")]
    SlotNotFound,
    #[error("time slot is fully booked")]
    SlotFull,
    #[error("service is not open for booking")]
    ServiceInactive,
    #[error("booking not found")]
    BookingNotFound,
    #[error("business not found")]
    BusinessNotFound,
    #[error("customer not found")]
    CustomerNotFound,
    #[error("not allowed to manage this booking")]
    Forbidden,
    #[error("business has no active subscription")]
    NoActiveSubscription,
    #[error("monthly booking quota reached")]
    QuotaExceeded,
    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BookingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            BookingError::SlotNotFound
            | BookingError::BookingNotFound
            | BookingError::BusinessNotFound
            | BookingError::CustomerNotFound => StatusCode::NOT_FOUND,
            BookingError::SlotFull | BookingError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            BookingError::ServiceInactive => StatusCode::BAD_REQUEST,
            BookingError::Forbidden => StatusCode::FORBIDDEN,
            BookingError::NoActiveSubscription | BookingError::QuotaExceeded => {
                StatusCode::PAYMENT_REQUIRED
            }
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, BookingError>;

fn split_name(full_name: &str) -> (String, String) {
    match full_name.trim().split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (full_name.trim().to_string(), String::new()),
    }
}

pub struct BookingUseCase<B, C, R, S>
where
    B: BookingRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
    R: CrmRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    booking_repo: Arc<B>,
    catalog_repo: Arc<C>,
    crm_repo: Arc<R>,
    subscription_repo: Arc<S>,
    mailer: EmailQueue,
}

impl<B, C, R, S> BookingUseCase<B, C, R, S>
where
    B: BookingRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
    R: CrmRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    pub fn new(
        booking_repo: Arc<B>,
        catalog_repo: Arc<C>,
        crm_repo: Arc<R>,
        subscription_repo: Arc<S>,
        mailer: EmailQueue,
    ) -> Self {
        Self {
            booking_repo,
            catalog_repo,
            crm_repo,
            subscription_repo,
            mailer,
        }
    }

    async fn ensure_business_manager(
        &self,
        business_id: Uuid,
        auth_user: &AuthUser,
    ) -> UseCaseResult<()> {
        let business = self
            .catalog_repo
            .find_business(business_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::BusinessNotFound)?;

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
            .map_err(BookingError::Internal)?;
        let is_active_staff = staff
            .iter()
            .any(|member| member.user_id == auth_user.user_id && member.is_active);
        if can_access(auth_user, operations(is_active_staff)) {
            return Ok(());
        }

        warn!(
            %business_id,
            user_id = %auth_user.user_id,
            "bookings: rejected non-member access"
        );
        Err(BookingError::Forbidden)
    }

    /// A booking is visible to the business side and to the customer who
    /// made it.
    async fn ensure_booking_party(
        &self,
        booking: &BookingEntity,
        auth_user: &AuthUser,
    ) -> UseCaseResult<()> {
        let business = self
            .catalog_repo
            .find_business(booking.business_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::BusinessNotFound)?;

        let party = |is_active_staff| Resource::Booking {
            owner_id: business.owner_id,
            is_active_staff,
            customer_email: &booking.customer_email,
        };
        if can_access(auth_user, party(false)) {
            return Ok(());
        }

        let staff = self
            .catalog_repo
            .list_staff(booking.business_id)
            .await
            .map_err(BookingError::Internal)?;
        let is_active_staff = staff
            .iter()
            .any(|member| member.user_id == auth_user.user_id && member.is_active);
        if can_access(auth_user, party(is_active_staff)) {
            return Ok(());
        }

        warn!(
            booking_id = %booking.id,
            user_id = %auth_user.user_id,
            "bookings: rejected access to booking"
        );
        Err(BookingError::Forbidden)
    }

    async fn check_booking_quota(&self, business_id: Uuid) -> UseCaseResult<()> {
        let subscription = self
            .subscription_repo
            .find_by_business(business_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::NoActiveSubscription)?;

        if !subscription.is_active(Utc::now()) {
            return Err(BookingError::NoActiveSubscription);
        }

        let plan = self
            .subscription_repo
            .find_plan(subscription.plan_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or_else(|| {
                BookingError::Internal(anyhow!(
                    "subscription {} references missing plan {}",
                    subscription.id,
                    subscription.plan_id
                ))
            })?;

        if !can_add_booking(
            plan.max_bookings_per_month,
            subscription.current_month_bookings,
        ) {
            warn!(
                %business_id,
                current = subscription.current_month_bookings,
                quota = plan.max_bookings_per_month,
                "bookings: monthly quota reached"
            );
            return Err(BookingError::QuotaExceeded);
        }

        Ok(())
    }

    async fn resolve_customer(
        &self,
        business_id: Uuid,
        create_model: &CreateBookingModel,
    ) -> UseCaseResult<Uuid> {
        let email = create_model.customer.email.trim().to_lowercase();

        if let Some(existing) = self
            .crm_repo
            .find_customer_by_email(business_id, &email)
            .await
            .map_err(BookingError::Internal)?
        {
            return Ok(existing.id);
        }

        let (first_name, last_name) = split_name(&create_model.customer.name);
        let now = Utc::now();
        let customer_id = self
            .crm_repo
            .create_customer(InsertCustomerEntity {
                business_id,
                user_id: None,
                first_name,
                last_name,
                email,
                phone: create_model.customer.phone.clone(),
                notes: create_model.customer.notes.clone(),
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
            .map_err(BookingError::Internal)?;

        Ok(customer_id)
    }

    pub async fn create_booking(
        &self,
        create_model: CreateBookingModel,
    ) -> UseCaseResult<BookingModel> {
        let slot = self
            .catalog_repo
            .find_time_slot(create_model.time_slot_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::SlotNotFound)?;

        // Fast rejection; the insert transaction re-checks under a row lock.
        if !slot.is_bookable() {
            return Err(BookingError::SlotFull);
        }

        let service = self
            .catalog_repo
            .find_service(slot.service_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or_else(|| {
                BookingError::Internal(anyhow!("slot {} references missing service", slot.id))
            })?;
        if !service.is_active {
            return Err(BookingError::ServiceInactive);
        }

        self.check_booking_quota(slot.business_id).await?;

        let customer_id = self.resolve_customer(slot.business_id, &create_model).await?;

        let service_price_minor = service.price_minor;
        let discount_minor =
            (service.price_minor - service.current_price_minor()) + create_model.discount_minor;
        let total_amount_minor =
            calculate_total_minor(service_price_minor, discount_minor, create_model.tax_minor);

        for attempt in 1..=BOOKING_NUMBER_ATTEMPTS {
            let booking_number = {
                let mut rng = rand::thread_rng();
                generate_booking_number(slot.date, &mut rng)
            };
            let now = Utc::now();

            let insert_entity = InsertBookingEntity {
                booking_number,
                business_id: slot.business_id,
                service_id: service.id,
                time_slot_id: Some(slot.id),
                customer_id,
                date: slot.date,
                start_time: slot.start_time,
                end_time: slot.end_time,
                customer_name: create_model.customer.name.clone(),
                customer_email: create_model.customer.email.trim().to_lowercase(),
                customer_phone: create_model.customer.phone.clone(),
                customer_notes: create_model.customer.notes.clone(),
                status: BookingStatus::Pending.to_string(),
                payment_status: PaymentStatus::Pending.to_string(),
                service_price_minor,
                discount_minor,
                tax_minor: create_model.tax_minor,
                total_amount_minor,
                source: create_model.source.clone(),
                created_at: now,
                updated_at: now,
            };

            match self.booking_repo.create_booking(insert_entity).await {
                Ok(booking) => {
                    info!(
                        booking_id = %booking.id,
                        booking_number = %booking.booking_number,
                        business_id = %booking.business_id,
                        "bookings: booking created"
                    );
                    self.mailer.try_enqueue(email::booking_received_email(
                        &booking.customer_email,
                        &booking.customer_name,
                        &booking.booking_number,
                    ));
                    return Ok(BookingModel::from(booking));
                }
                Err(err) => match err.downcast_ref::<BookingConflict>() {
                    Some(BookingConflict::DuplicateBookingNumber) => {
                        warn!(attempt, "bookings: booking number collision, retrying");
                        continue;
                    }
                    Some(BookingConflict::SlotNotFound) => return Err(BookingError::SlotNotFound),
                    Some(BookingConflict::SlotFull) => return Err(BookingError::SlotFull),
                    None => {
                        error!(db_error = ?err, "bookings: failed to create booking");
                        return Err(BookingError::Internal(err));
                    }
                },
            }
        }

        Err(BookingError::Internal(anyhow!(
            "could not allocate a unique booking number after {} attempts",
            BOOKING_NUMBER_ATTEMPTS
        )))
    }

    pub async fn get_booking(
        &self,
        auth_user: &AuthUser,
        booking_id: Uuid,
    ) -> UseCaseResult<BookingModel> {
        let booking = self
            .booking_repo
            .find_booking(booking_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::BookingNotFound)?;

        self.ensure_booking_party(&booking, auth_user).await?;

        Ok(BookingModel::from(booking))
    }

    pub async fn list_bookings(
        &self,
        auth_user: &AuthUser,
        business_id: Uuid,
        filter: BookingListFilter,
    ) -> UseCaseResult<Vec<BookingModel>> {
        self.ensure_business_manager(business_id, auth_user).await?;

        let bookings = self
            .booking_repo
            .list_bookings(business_id, filter)
            .await
            .map_err(BookingError::Internal)?;
        Ok(bookings.into_iter().map(BookingModel::from).collect())
    }

    async fn load_for_transition(
        &self,
        auth_user: &AuthUser,
        booking_id: Uuid,
        target: BookingStatus,
    ) -> UseCaseResult<BookingEntity> {
        let booking = self
            .booking_repo
            .find_booking(booking_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::BookingNotFound)?;

        self.ensure_business_manager(booking.business_id, auth_user)
            .await?;

        let current = BookingStatus::from_str(&booking.status);
        if !current.can_transition_to(target) {
            return Err(BookingError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        Ok(booking)
    }

    pub async fn confirm_booking(
        &self,
        auth_user: &AuthUser,
        booking_id: Uuid,
    ) -> UseCaseResult<()> {
        let booking = self
            .load_for_transition(auth_user, booking_id, BookingStatus::Confirmed)
            .await?;

        self.booking_repo
            .confirm(booking_id, Utc::now())
            .await
            .map_err(BookingError::Internal)?;

        self.mailer.try_enqueue(email::booking_status_email(
            &booking.customer_email,
            &booking.customer_name,
            &booking.booking_number,
            "confirmed",
        ));

        info!(%booking_id, "bookings: booking confirmed");
        Ok(())
    }

    pub async fn start_booking(
        &self,
        auth_user: &AuthUser,
        booking_id: Uuid,
    ) -> UseCaseResult<()> {
        self.load_for_transition(auth_user, booking_id, BookingStatus::InProgress)
            .await?;

        self.booking_repo
            .start(booking_id, Utc::now())
            .await
            .map_err(BookingError::Internal)?;

        info!(%booking_id, "bookings: booking started");
        Ok(())
    }

    pub async fn complete_booking(
        &self,
        auth_user: &AuthUser,
        booking_id: Uuid,
    ) -> UseCaseResult<()> {
        self.load_for_transition(auth_user, booking_id, BookingStatus::Completed)
            .await?;

        self.booking_repo
            .complete(booking_id, Utc::now())
            .await
            .map_err(BookingError::Internal)?;

        info!(%booking_id, "bookings: booking completed");
        Ok(())
    }

    /// Cancellation is open to business members and to the customer who made
    /// the booking.
    pub async fn cancel_booking(
        &self,
        auth_user: &AuthUser,
        booking_id: Uuid,
        cancel_model: CancelBookingModel,
    ) -> UseCaseResult<()> {
        let booking = self
            .booking_repo
            .find_booking(booking_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::BookingNotFound)?;

        self.ensure_booking_party(&booking, auth_user).await?;

        let current = BookingStatus::from_str(&booking.status);
        if !current.can_transition_to(BookingStatus::Cancelled) {
            return Err(BookingError::InvalidTransition {
                from: current,
                to: BookingStatus::Cancelled,
            });
        }

        self.booking_repo
            .cancel(CancelBookingArgs {
                booking_id,
                cancelled_by: auth_user.user_id,
                reason: cancel_model.reason,
                at: Utc::now(),
            })
            .await
            .map_err(BookingError::Internal)?;

        self.mailer.try_enqueue(email::booking_status_email(
            &booking.customer_email,
            &booking.customer_name,
            &booking.booking_number,
            "cancelled",
        ));

        info!(%booking_id, "bookings: booking cancelled");
        Ok(())
    }

    /// Recent bookings for one CRM customer, newest first. Backs the
    /// customer detail page.
    pub async fn customer_booking_history(
        &self,
        auth_user: &AuthUser,
        customer_id: Uuid,
        limit: i64,
    ) -> UseCaseResult<Vec<BookingModel>> {
        let customer = self
            .crm_repo
            .find_customer(customer_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::CustomerNotFound)?;

        self.ensure_business_manager(customer.business_id, auth_user)
            .await?;

        let bookings = self
            .booking_repo
            .list_recent_by_customer(customer_id, limit)
            .await
            .map_err(BookingError::Internal)?;
        Ok(bookings.into_iter().map(BookingModel::from).collect())
    }

    pub async fn mark_no_show(
        &self,
        auth_user: &AuthUser,
        booking_id: Uuid,
    ) -> UseCaseResult<()> {
        self.load_for_transition(auth_user, booking_id, BookingStatus::NoShow)
            .await?;

        self.booking_repo
            .mark_no_show(booking_id, Utc::now())
            .await
            .map_err(BookingError::Internal)?;

        info!(%booking_id, "bookings: booking marked as no-show");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::user_roles::UserRole;
    use crate::domain::{
        entities::{
            bookings::BookingEntity, businesses::BusinessEntity, customers::CustomerEntity,
            plans::PlanEntity, services::ServiceEntity, subscriptions::SubscriptionEntity,
            time_slots::TimeSlotEntity,
        },
        repositories::{
            bookings::MockBookingRepository, catalog::MockCatalogRepository,
            crm::MockCrmRepository, subscriptions::MockSubscriptionRepository,
        },
    };
    use crate::infrastructure::email::LogEmailSender;
    use chrono::{Duration, NaiveDate, NaiveTime};
    use mockall::Sequence;

    type TestUseCase = BookingUseCase<
        MockBookingRepository,
        MockCatalogRepository,
        MockCrmRepository,
        MockSubscriptionRepository,
    >;

    fn usecase(
        booking: MockBookingRepository,
        catalog: MockCatalogRepository,
        crm: MockCrmRepository,
        subs: MockSubscriptionRepository,
    ) -> TestUseCase {
        let mailer = EmailQueue::new(Arc::new(LogEmailSender::new("test".to_string())));
        BookingUseCase::new(
            Arc::new(booking),
            Arc::new(catalog),
            Arc::new(crm),
            Arc::new(subs),
            mailer,
        )
    }

    fn slot(business_id: Uuid, service_id: Uuid, current: i32, max: i32) -> TimeSlotEntity {
        TimeSlotEntity {
            id: Uuid::new_v4(),
            business_id,
            service_id,
            staff_id: None,
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            is_available: true,
            max_bookings: max,
            current_bookings: current,
            created_at: Utc::now(),
        }
    }

    fn service(id: Uuid, business_id: Uuid) -> ServiceEntity {
        ServiceEntity {
            id,
            business_id,
            name: "Haircut".to_string(),
            description: String::new(),
            duration_minutes: 30,
            price_minor: 3000,
            discounted_price_minor: Some(2500),
            max_bookings_per_slot: 1,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn plan_with_quota(max_bookings_per_month: i32) -> PlanEntity {
        PlanEntity {
            id: Uuid::new_v4(),
            name: "Starter".to_string(),
            slug: "starter".to_string(),
            description: String::new(),
            price_minor: 2900,
            billing_period: "MONTHLY".to_string(),
            trial_days: 14,
            max_staff: 5,
            max_services: 10,
            max_bookings_per_month,
            features: serde_json::json!({}),
            is_popular: false,
            is_active: true,
            display_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn subscription(business_id: Uuid, plan_id: Uuid, used: i32) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            business_id,
            plan_id,
            status: "ACTIVE".to_string(),
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(29),
            trial_end_date: None,
            next_billing_date: now + Duration::days(29),
            last_payment_date: None,
            last_payment_amount_minor: None,
            current_month_bookings: used,
            total_bookings: used,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn customer(business_id: Uuid) -> CustomerEntity {
        CustomerEntity {
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
        }
    }

    fn entity_from_insert(insert: InsertBookingEntity) -> BookingEntity {
        BookingEntity {
            id: Uuid::new_v4(),
            booking_number: insert.booking_number,
            business_id: insert.business_id,
            service_id: insert.service_id,
            time_slot_id: insert.time_slot_id,
            customer_id: insert.customer_id,
            date: insert.date,
            start_time: insert.start_time,
            end_time: insert.end_time,
            customer_name: insert.customer_name,
            customer_email: insert.customer_email,
            customer_phone: insert.customer_phone,
            customer_notes: insert.customer_notes,
            status: insert.status,
            payment_status: insert.payment_status,
            service_price_minor: insert.service_price_minor,
            discount_minor: insert.discount_minor,
            tax_minor: insert.tax_minor,
            total_amount_minor: insert.total_amount_minor,
            source: insert.source,
            cancelled_by: None,
            cancellation_reason: None,
            created_at: insert.created_at,
            updated_at: insert.updated_at,
            confirmed_at: None,
            cancelled_at: None,
            completed_at: None,
        }
    }

    fn create_model(slot_id: Uuid) -> CreateBookingModel {
        CreateBookingModel {
            time_slot_id: slot_id,
            customer: crate::domain::value_objects::bookings::BookingCustomerModel {
                name: "Jo Doe".to_string(),
                email: "jo@example.com".to_string(),
                phone: "555-0001".to_string(),
                notes: String::new(),
            },
            discount_minor: 0,
            tax_minor: 0,
            source: "WEBSITE".to_string(),
        }
    }

    #[tokio::test]
    async fn create_booking_computes_totals_from_service_price() {
        let business_id = Uuid::new_v4();
        let service_id = Uuid::new_v4();
        let the_slot = slot(business_id, service_id, 0, 3);
        let slot_id = the_slot.id;
        let the_plan = plan_with_quota(100);
        let plan_id = the_plan.id;

        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find_time_slot()
            .returning(move |_| Ok(Some(the_slot.clone())));
        catalog
            .expect_find_service()
            .returning(move |_| Ok(Some(service(service_id, business_id))));
        let mut subs = MockSubscriptionRepository::new();
        subs.expect_find_by_business()
            .returning(move |_| Ok(Some(subscription(business_id, plan_id, 10))));
        subs.expect_find_plan()
            .returning(move |_| Ok(Some(the_plan.clone())));
        let mut crm = MockCrmRepository::new();
        crm.expect_find_customer_by_email()
            .returning(move |_, _| Ok(Some(customer(business_id))));
        let mut booking = MockBookingRepository::new();
        booking
            .expect_create_booking()
            .returning(|insert| Ok(entity_from_insert(insert)));

        let created = usecase(booking, catalog, crm, subs)
            .create_booking(create_model(slot_id))
            .await
            .expect("booking should be created");

        assert_eq!(created.service_price_minor, 3000);
        assert_eq!(created.discount_minor, 500);
        assert_eq!(created.total_amount_minor, 2500);
        assert_eq!(created.status, BookingStatus::Pending);
        assert!(created.booking_number.starts_with("BK20260901"));
    }

    #[tokio::test]
    async fn create_booking_rejects_full_slot() {
        let business_id = Uuid::new_v4();
        let service_id = Uuid::new_v4();
        let the_slot = slot(business_id, service_id, 3, 3);
        let slot_id = the_slot.id;

        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find_time_slot()
            .returning(move |_| Ok(Some(the_slot.clone())));

        let result = usecase(
            MockBookingRepository::new(),
            catalog,
            MockCrmRepository::new(),
            MockSubscriptionRepository::new(),
        )
        .create_booking(create_model(slot_id))
        .await;

        assert!(matches!(result, Err(BookingError::SlotFull)));
    }

    #[tokio::test]
    async fn create_booking_rejects_exhausted_quota() {
        let business_id = Uuid::new_v4();
        let service_id = Uuid::new_v4();
        let the_slot = slot(business_id, service_id, 0, 3);
        let slot_id = the_slot.id;
        let the_plan = plan_with_quota(100);
        let plan_id = the_plan.id;

        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find_time_slot()
            .returning(move |_| Ok(Some(the_slot.clone())));
        catalog
            .expect_find_service()
            .returning(move |_| Ok(Some(service(service_id, business_id))));
        let mut subs = MockSubscriptionRepository::new();
        subs.expect_find_by_business()
            .returning(move |_| Ok(Some(subscription(business_id, plan_id, 100))));
        subs.expect_find_plan()
            .returning(move |_| Ok(Some(the_plan.clone())));

        let result = usecase(
            MockBookingRepository::new(),
            catalog,
            MockCrmRepository::new(),
            subs,
        )
        .create_booking(create_model(slot_id))
        .await;

        assert!(matches!(result, Err(BookingError::QuotaExceeded)));
    }

    #[tokio::test]
    async fn create_booking_retries_on_number_collision() {
        let business_id = Uuid::new_v4();
        let service_id = Uuid::new_v4();
        let the_slot = slot(business_id, service_id, 0, 3);
        let slot_id = the_slot.id;
        let the_plan = plan_with_quota(-1);
        let plan_id = the_plan.id;

        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find_time_slot()
            .returning(move |_| Ok(Some(the_slot.clone())));
        catalog
            .expect_find_service()
            .returning(move |_| Ok(Some(service(service_id, business_id))));
        let mut subs = MockSubscriptionRepository::new();
        subs.expect_find_by_business()
            .returning(move |_| Ok(Some(subscription(business_id, plan_id, 0))));
        subs.expect_find_plan()
            .returning(move |_| Ok(Some(the_plan.clone())));
        let mut crm = MockCrmRepository::new();
        crm.expect_find_customer_by_email()
            .returning(move |_, _| Ok(Some(customer(business_id))));

        let mut booking = MockBookingRepository::new();
        let mut seq = Sequence::new();
        booking
            .expect_create_booking()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::Error::from(BookingConflict::DuplicateBookingNumber)));
        booking
            .expect_create_booking()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|insert| Ok(entity_from_insert(insert)));

        let created = usecase(booking, catalog, crm, subs)
            .create_booking(create_model(slot_id))
            .await
            .expect("retry should succeed");

        assert!(created.booking_number.starts_with("BK"));
    }

    #[tokio::test]
    async fn confirm_rejects_terminal_booking() {
        let owner_id = Uuid::new_v4();
        let business_id = Uuid::new_v4();
        let booking_id = Uuid::new_v4();

        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_find_booking().returning(move |_| {
            let mut entity = entity_from_insert(InsertBookingEntity {
                booking_number: "BK202609011234".to_string(),
                business_id,
                service_id: Uuid::new_v4(),
                time_slot_id: None,
                customer_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
                customer_name: "Jo Doe".to_string(),
                customer_email: "jo@example.com".to_string(),
                customer_phone: String::new(),
                customer_notes: String::new(),
                status: BookingStatus::Completed.to_string(),
                payment_status: PaymentStatus::Paid.to_string(),
                service_price_minor: 3000,
                discount_minor: 0,
                tax_minor: 0,
                total_amount_minor: 3000,
                source: "WEBSITE".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
            entity.id = booking_id;
            Ok(Some(entity))
        });
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

        let auth_user = AuthUser {
            user_id: owner_id,
            email: "owner@example.com".to_string(),
            role: UserRole::BusinessAdmin,
        };

        let result = usecase(
            booking_repo,
            catalog,
            MockCrmRepository::new(),
            MockSubscriptionRepository::new(),
        )
        .confirm_booking(&auth_user, booking_id)
        .await;

        assert!(matches!(
            result,
            Err(BookingError::InvalidTransition {
                from: BookingStatus::Completed,
                to: BookingStatus::Confirmed,
            })
        ));
    }

    #[tokio::test]
    async fn cancel_rejects_unrelated_user() {
        let business_id = Uuid::new_v4();
        let booking_id = Uuid::new_v4();

        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_find_booking().returning(move |_| {
            let mut entity = entity_from_insert(InsertBookingEntity {
                booking_number: "BK202609011234".to_string(),
                business_id,
                service_id: Uuid::new_v4(),
                time_slot_id: None,
                customer_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
                customer_name: "Jo Doe".to_string(),
                customer_email: "jo@example.com".to_string(),
                customer_phone: String::new(),
                customer_notes: String::new(),
                status: BookingStatus::Pending.to_string(),
                payment_status: PaymentStatus::Pending.to_string(),
                service_price_minor: 3000,
                discount_minor: 0,
                tax_minor: 0,
                total_amount_minor: 3000,
                source: "WEBSITE".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
            entity.id = booking_id;
            Ok(Some(entity))
        });
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_business().returning(move |_| {
            Ok(Some(BusinessEntity {
                id: business_id,
                owner_id: Uuid::new_v4(),
                name: "Glow Studio".to_string(),
                slug: "glow-studio".to_string(),
                phone: String::new(),
                address: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });
        catalog.expect_list_staff().returning(|_| Ok(vec![]));

        let stranger = AuthUser {
            user_id: Uuid::new_v4(),
            email: "stranger@example.com".to_string(),
            role: UserRole::Client,
        };

        let result = usecase(
            booking_repo,
            catalog,
            MockCrmRepository::new(),
            MockSubscriptionRepository::new(),
        )
        .cancel_booking(&stranger, booking_id, CancelBookingModel { reason: String::new() })
        .await;

        assert!(matches!(result, Err(BookingError::Forbidden)));
    }

    #[tokio::test]
    async fn booking_customer_can_view_and_cancel_own_booking() {
        let business_id = Uuid::new_v4();
        let booking_id = Uuid::new_v4();

        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_find_booking().returning(move |_| {
            let mut entity = entity_from_insert(InsertBookingEntity {
                booking_number: "BK202609015678".to_string(),
                business_id,
                service_id: Uuid::new_v4(),
                time_slot_id: None,
                customer_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
                customer_name: "Jo Doe".to_string(),
                customer_email: "jo@example.com".to_string(),
                customer_phone: String::new(),
                customer_notes: String::new(),
                status: BookingStatus::Pending.to_string(),
                payment_status: PaymentStatus::Pending.to_string(),
                service_price_minor: 3000,
                discount_minor: 0,
                tax_minor: 0,
                total_amount_minor: 3000,
                source: "WEBSITE".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
            entity.id = booking_id;
            Ok(Some(entity))
        });
        booking_repo.expect_cancel().returning(|_| Ok(()));
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_business().returning(move |_| {
            Ok(Some(BusinessEntity {
                id: business_id,
                owner_id: Uuid::new_v4(),
                name: "Glow Studio".to_string(),
                slug: "glow-studio".to_string(),
                phone: String::new(),
                address: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });

        let customer = AuthUser {
            user_id: Uuid::new_v4(),
            email: "jo@example.com".to_string(),
            role: UserRole::Client,
        };

        let cases = usecase(
            booking_repo,
            catalog,
            MockCrmRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let viewed = cases
            .get_booking(&customer, booking_id)
            .await
            .expect("customer should see own booking");
        assert_eq!(viewed.customer_email, "jo@example.com");

        cases
            .cancel_booking(
                &customer,
                booking_id,
                CancelBookingModel {
                    reason: "change of plans".to_string(),
                },
            )
            .await
            .expect("customer should cancel own booking");
    }
}
