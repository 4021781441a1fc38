//! Listing filters: a small config object folded into SQL predicates by the
//! repository. Unknown status values fail deserialization, so they never
//! reach the query builder.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

/// Status predicate vocabulary, as exposed on the query string.
///
/// Note the `Delivered` predicate: it intentionally matches `sent_at NOT
/// NULL`, so orders on the road still show up under `status=delivered`. The
/// filter keeps that behavior; the state machine itself distinguishes the two
/// stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum StatusFilter {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in process")]
    InProcess,
    #[serde(rename = "sent")]
    Sent,
    #[serde(rename = "delivered")]
    Delivered,
}

/// Conjunction of optional listing predicates.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<StatusFilter>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl OrderFilter {
    /// Inclusive lower bound on `created_at`: midnight UTC of `from`.
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.from.map(start_of_day)
    }

    /// Inclusive upper bound on `created_at`: midnight UTC of the day after
    /// `to`, approximating an inclusive end-of-day. Saturates at the calendar
    /// maximum so the bound is never silently dropped.
    pub fn created_until(&self) -> Option<DateTime<Utc>> {
        self.to.map(|date| match date.succ_opt() {
            Some(next) => start_of_day(next),
            None => DateTime::<Utc>::MAX_UTC,
        })
    }
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn status_parses_the_four_query_values() {
        let cases = [
            ("pending", StatusFilter::Pending),
            ("in process", StatusFilter::InProcess),
            ("sent", StatusFilter::Sent),
            ("delivered", StatusFilter::Delivered),
        ];
        for (text, expected) in cases {
            let parsed: StatusFilter =
                serde_json::from_value(serde_json::Value::String(text.to_string()))
                    .expect("status should parse");
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<StatusFilter, _> =
            serde_json::from_value(serde_json::Value::String("onhold".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn from_bound_is_midnight_utc() {
        let filter = OrderFilter {
            from: Some(date(2025, 8, 18)),
            ..OrderFilter::default()
        };
        assert_eq!(
            filter.created_from(),
            Some(Utc.with_ymd_and_hms(2025, 8, 18, 0, 0, 0).unwrap())
        );
        assert_eq!(filter.created_until(), None);
    }

    #[test]
    fn to_bound_extends_one_full_day() {
        // to=2025-08-18 must still match orders created at 18:00 that day, so
        // the upper bound is the following midnight.
        let filter = OrderFilter {
            to: Some(date(2025, 8, 18)),
            ..OrderFilter::default()
        };
        assert_eq!(
            filter.created_until(),
            Some(Utc.with_ymd_and_hms(2025, 8, 19, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn to_bound_crosses_month_end() {
        let filter = OrderFilter {
            to: Some(date(2025, 8, 31)),
            ..OrderFilter::default()
        };
        assert_eq!(
            filter.created_until(),
            Some(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn to_bound_saturates_at_the_last_representable_day() {
        // The day after `NaiveDate::MAX` does not exist; the bound must
        // saturate rather than leave the query unbounded.
        let filter = OrderFilter {
            to: Some(NaiveDate::MAX),
            ..OrderFilter::default()
        };
        assert_eq!(filter.created_until(), Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn empty_filter_has_no_bounds() {
        let filter = OrderFilter::default();
        assert_eq!(filter.created_from(), None);
        assert_eq!(filter.created_until(), None);
        assert!(filter.status.is_none());
    }
}
