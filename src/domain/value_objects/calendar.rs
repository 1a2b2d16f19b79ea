use serde::Serialize;

use crate::domain::{
    entities::bookings::BookingEntity, value_objects::enums::booking_statuses::BookingStatus,
};

/// Event shape consumed by the FullCalendar widget on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEventModel {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    #[serde(rename = "extendedProps")]
    pub extended_props: CalendarEventProps,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarEventProps {
    pub status: BookingStatus,
    pub customer: String,
    pub phone: String,
    pub service: String,
}

pub fn status_color(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "#FFA500",
        BookingStatus::Confirmed => "#4CAF50",
        BookingStatus::InProgress => "#2196F3",
        BookingStatus::Completed => "#9E9E9E",
        BookingStatus::Cancelled => "#F44336",
        BookingStatus::NoShow => "#795548",
    }
}

impl CalendarEventModel {
    pub fn from_booking(booking: &BookingEntity, service_name: &str) -> Self {
        let status = BookingStatus::from_str(&booking.status);
        Self {
            id: booking.id.to_string(),
            title: format!("{} - {}", service_name, booking.customer_name),
            start: format!("{}T{}", booking.date, booking.start_time),
            end: format!("{}T{}", booking.date, booking.end_time),
            background_color: status_color(status).to_string(),
            extended_props: CalendarEventProps {
                status,
                customer: booking.customer_name.clone(),
                phone: booking.customer_phone.clone(),
                service: service_name.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    fn booking() -> BookingEntity {
        BookingEntity {
            id: Uuid::new_v4(),
            booking_number: "BK202608251234".to_string(),
            business_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            time_slot_id: None,
            customer_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 8, 25).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            customer_name: "Dana Fox".to_string(),
            customer_email: "dana@example.com".to_string(),
            customer_phone: "+1555000".to_string(),
            customer_notes: String::new(),
            status: "CONFIRMED".to_string(),
            payment_status: "PENDING".to_string(),
            service_price_minor: 5000,
            discount_minor: 0,
            tax_minor: 0,
            total_amount_minor: 5000,
            source: "WEBSITE".to_string(),
            cancelled_by: None,
            cancellation_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            confirmed_at: None,
            cancelled_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn event_uses_fullcalendar_field_names() {
        let event = CalendarEventModel::from_booking(&booking(), "Haircut");
        let json = serde_json::to_value(&event).unwrap();

        assert!(json.get("backgroundColor").is_some());
        assert!(json.get("extendedProps").is_some());
        assert_eq!(json["extendedProps"]["customer"], "Dana Fox");
        assert_eq!(json["extendedProps"]["service"], "Haircut");
        assert_eq!(json["start"], "2026-08-25T10:00:00");
        assert_eq!(json["end"], "2026-08-25T10:30:00");
    }

    #[test]
    fn colors_follow_booking_status() {
        assert_eq!(status_color(BookingStatus::Pending), "#FFA500");
        assert_eq!(status_color(BookingStatus::Confirmed), "#4CAF50");
        assert_eq!(status_color(BookingStatus::Cancelled), "#F44336");
    }
}
