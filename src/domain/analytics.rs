//! Daily counters shown on a restaurant's dashboard.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RestaurantAnalytics {
    pub restaurant_id: Uuid,
    /// Orders created during yesterday's full 24h window.
    pub num_yesterday_orders: i64,
    /// Orders whose lifecycle has not started yet, regardless of age.
    pub num_pending_orders: i64,
    /// Orders delivered since today's midnight.
    pub num_delivered_today_orders: i64,
    /// Σ price of orders *created* since today's midnight. Aggregating by
    /// creation rather than confirmation time is the documented behavior.
    pub invoiced_today: BigDecimal,
}

/// Today's midnight in UTC, relative to `now`.
pub fn start_of_today(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Yesterday's midnight in UTC, relative to `now`.
pub fn start_of_yesterday(now: DateTime<Utc>) -> DateTime<Utc> {
    start_of_today(now) - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn windows_are_anchored_to_utc_midnights() {
        let now = Utc.with_ymd_and_hms(2025, 8, 18, 15, 42, 7).unwrap();
        assert_eq!(
            start_of_today(now),
            Utc.with_ymd_and_hms(2025, 8, 18, 0, 0, 0).unwrap()
        );
        assert_eq!(
            start_of_yesterday(now),
            Utc.with_ymd_and_hms(2025, 8, 17, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn yesterday_window_spans_a_month_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 30, 0).unwrap();
        assert_eq!(
            start_of_yesterday(now),
            Utc.with_ymd_and_hms(2025, 8, 31, 0, 0, 0).unwrap()
        );
    }
}
