//! Calendar-date ranges over `createdAt`-shaped fields.
//!
//! Rows carry dates in whatever shape the API produced: RFC 3339 strings,
//! bare `YYYY-MM-DD`, naive `YYYY-MM-DD HH:MM:SS`, or epoch milliseconds.
//! All of them reduce to a UTC calendar date before comparison.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Result, SeekerError};
use crate::value::{Timestamp, Value};

/// An inclusive range of calendar dates. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting one whose start lies after its end.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(SeekerError::InvertedRange {
                    start: s.to_string(),
                    end: e.to_string(),
                });
            }
        }
        Ok(DateRange { start, end })
    }

    /// A range with no bounds.
    pub fn unbounded() -> Self {
        DateRange::default()
    }

    /// Returns `true` when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Checks a date against both bounds, inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// Checks a field value.
    ///
    /// An unbounded range accepts everything. Otherwise a value with no
    /// recognizable date fails.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        value_date(value).is_some_and(|date| self.contains(date))
    }

    /// Parses a `YYYY-MM-DD` bound as it appears in the URL.
    pub fn parse_bound(input: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map_err(|_| SeekerError::InvalidDate(input.to_string()))
    }
}

/// Parses the date portion of a row's date string.
///
/// Accepts RFC 3339 (normalized to UTC), `YYYY-MM-DD`, and naive
/// `YYYY-MM-DD[T ]HH:MM:SS[.fff]`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}

/// Extracts a calendar date from a field value.
///
/// Numbers are read as epoch milliseconds.
pub fn value_date(value: &Value<'_>) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Timestamp(ts) => ts.to_datetime().map(|dt| dt.date_naive()),
        Value::Number(n) => {
            let millis = n.to_f64();
            if millis.is_finite() {
                Timestamp(millis as i64)
                    .to_datetime()
                    .map(|dt| dt.date_naive())
            } else {
                None
            }
        }
        _ => None,
    }
}
