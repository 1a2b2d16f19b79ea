use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::bookings::BookingModel;

#[derive(Debug, Clone, Serialize)]
pub struct BusinessOverviewModel {
    pub business_id: Uuid,
    pub today_bookings: i64,
    pub today_revenue_minor: i64,
    pub monthly_bookings: i64,
    pub monthly_revenue_minor: i64,
    pub pending_bookings: i64,
    pub new_customers: i64,
    pub upcoming_bookings: Vec<BookingModel>,
    pub trend: Vec<TrendPointModel>,
    pub top_services: Vec<TopServiceModel>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPointModel {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopServiceModel {
    pub service_id: Uuid,
    pub name: String,
    pub booking_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientOverviewModel {
    pub upcoming_bookings: Vec<BookingModel>,
    pub completed_bookings: i64,
    pub total_bookings: i64,
}

/// Fold raw booking dates into one point per day over the closed window.
/// Days without bookings are present with a zero count.
pub fn daily_trend(
    window_start: NaiveDate,
    window_end: NaiveDate,
    booking_dates: &[NaiveDate],
) -> Vec<TrendPointModel> {
    let mut points = Vec::new();
    let mut current = window_start;
    while current <= window_end {
        let count = booking_dates.iter().filter(|date| **date == current).count() as i64;
        points.push(TrendPointModel {
            date: current,
            count,
        });
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_fills_empty_days_with_zero() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let dates = vec![
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
        ];

        let points = daily_trend(start, end, &dates);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].count, 1);
        assert_eq!(points[1].count, 0);
        assert_eq!(points[2].count, 2);
    }
}
