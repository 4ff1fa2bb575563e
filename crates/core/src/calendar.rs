//! # Calendar Utilities
//!
//! Day-granularity date handling shared by the planning engine and the
//! request shim. All planning arithmetic works on `chrono::NaiveDate`;
//! dates cross the API boundary as `YYYY-MM-DD` strings.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{Error, ErrorCode};

/// Parse a strict `YYYY-MM-DD` date string.
pub fn parse_date(text: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
        Error::new(
            ErrorCode::InvalidInput,
            format!("Invalid date '{}', expected YYYY-MM-DD", text),
        )
    })
}

/// Signed calendar-day delta `to - from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Shift a date by a signed number of calendar days.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Inclusive length of a period in days. `period_days(d, d)` is 1.
pub fn period_days(start: NaiveDate, end: NaiveDate) -> i64 {
    days_between(start, end) + 1
}

/// Month bucket key in `YYYY-MM` form, used for seasonality markers.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Inclusive day-by-day iterator over `[start, end]`.
///
/// Yields nothing when `start > end`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let len = if start <= end {
        period_days(start, end)
    } else {
        0
    };
    (0..len).map(move |offset| add_days(start, offset))
}
