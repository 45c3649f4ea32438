//! Date helpers shared across crates.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::ParseError;

/// Parse `YYYY-MM-DD`, also accepting a full ISO-8601 timestamp whose first
/// ten characters are the date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = s.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|_| ParseError::Date(s.to_string()))
}

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| ParseError::Month(s.to_string()))
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.map_or(first, |next| next - Duration::days(1));
    (first, last)
}

/// Format an optional date, using an empty string for `None`.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
