use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::time_slots;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = time_slots)]
pub struct TimeSlotEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub max_bookings: i32,
    pub current_bookings: i32,
    pub created_at: DateTime<Utc>,
}

impl TimeSlotEntity {
    pub fn is_bookable(&self) -> bool {
        self.is_available && self.current_bookings < self.max_bookings
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = time_slots)]
pub struct InsertTimeSlotEntity {
    pub business_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub max_bookings: i32,
    pub current_bookings: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn slot(is_available: bool, current: i32, max: i32) -> TimeSlotEntity {
        TimeSlotEntity {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            staff_id: None,
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            is_available,
            max_bookings: max,
            current_bookings: current,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn bookable_only_when_available_and_below_capacity() {
        assert!(slot(true, 0, 1).is_bookable());
        assert!(slot(true, 2, 3).is_bookable());
        assert!(!slot(true, 3, 3).is_bookable());
        assert!(!slot(false, 0, 3).is_bookable());
    }
}
