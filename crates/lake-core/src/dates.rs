//! Best-effort date parsing for source records
//!
//! Reading dates arrive as free text such as "January 2018" or
//! "2018-01-15". Anything that does not parse sorts as the Unix epoch,
//! so malformed dates end up first in a chronological ordering.

use crate::types::WaterQualityReading;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// `"<MonthName> <YYYY>"`, matched against the full English month names
fn parse_month_year(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split_whitespace();
    let (month, year) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month = MONTH_NAMES.iter().position(|name| *name == month)? as u32 + 1;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

/// Month from a name or any prefix of it of at least three letters,
/// case-insensitive: "Sep", "Sept" and "september" are all 9
fn month_from_prefix(word: &str) -> Option<u32> {
    if word.len() < 3 || !word.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let word = word.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| name.to_ascii_lowercase().starts_with(&word))
        .map(|i| i as u32 + 1)
}

/// `"<month prefix> <YYYY>"`, e.g. "Jan 2018" or "Sept 2019"
fn parse_month_prefix_year(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split_whitespace();
    let (month, year) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month_from_prefix(month)?, 1)
}

/// Generic date or date-time string
fn parse_generic(s: &str) -> Option<NaiveDateTime> {
    // keep the wall-clock time as written, not its UTC equivalent
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    if let Some(d) = parse_month_prefix_year(s) {
        return d.and_hms_opt(0, 0, 0);
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1)?.and_hms_opt(0, 0, 0);
    }
    None
}

/// Parse a water-quality reading date label
pub fn parse_reading_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = parse_month_year(s) {
        return d.and_hms_opt(0, 0, 0);
    }
    parse_generic(s)
}

/// Chronological sort key for a reading date; unparseable labels map to
/// the Unix epoch
pub fn reading_sort_key(s: &str) -> NaiveDateTime {
    // NaiveDateTime::default() is 1970-01-01T00:00:00
    parse_reading_date(s).unwrap_or_default()
}

/// Stable chronological sort of readings by their date label
pub fn sort_readings(readings: &mut [WaterQualityReading]) {
    readings.sort_by_cached_key(|r| reading_sort_key(&r.date));
}

/// Satellite acquisition timestamp; date-only strings are midnight
pub fn parse_observation_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    parse_generic(s)
}

/// Calendar date of a satellite acquisition timestamp
pub fn parse_observation_date(s: &str) -> Option<NaiveDate> {
    parse_observation_timestamp(s).map(|dt| dt.date())
}
