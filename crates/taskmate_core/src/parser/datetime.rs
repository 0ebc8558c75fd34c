//! Due date extraction from free text.
//!
//! # Invariants
//! - A named-month date overrides `today`/`tomorrow` (last match wins).
//! - A time of day only refines an already established date.
//! - Dates without a time phrase resolve to local midnight.

use crate::clock::Clock;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

static TODAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btoday\b").expect("valid today regex"));
static TOMORROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btomorrow\b").expect("valid tomorrow regex"));
static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(on\s+)?(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?(?:\s*,?\s*(\d{4}))?\b",
    )
    .expect("valid month date regex")
});
static TIME_OF_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(at\s+)?(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("valid time regex")
});

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Extracts a due date-time from `text`, relative to `clock`.
///
/// Returns `None` when no date phrase is recognized. A time phrase on its
/// own (`"at 5pm"`) is dropped rather than anchored to today.
pub fn extract_date_time(text: &str, clock: &impl Clock) -> Option<DateTime<Local>> {
    let now = clock.now();
    let today = now.date_naive();

    let mut date = if TODAY_RE.is_match(text) {
        Some(today)
    } else if TOMORROW_RE.is_match(text) {
        today.succ_opt()
    } else {
        None
    };

    if let Some(named) = match_month_date(text, today.year()) {
        date = Some(named);
    }

    let date = date?;
    let time = match_time_of_day(text).unwrap_or(NaiveTime::MIN);
    resolve_local(date.and_time(time), date)
}

fn match_month_date(text: &str, default_year: i32) -> Option<NaiveDate> {
    let caps = MONTH_DATE_RE.captures(text)?;
    let month_name = caps.get(2)?.as_str().to_ascii_lowercase();
    let month = MONTH_NAMES
        .iter()
        .position(|name| *name == month_name)
        .map(|index| index as u32 + 1)?;
    let day = caps.get(3)?.as_str().parse::<u32>().ok()?;
    let year = match caps.get(4) {
        Some(value) => value.as_str().parse::<i32>().ok()?,
        None => default_year,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn match_time_of_day(text: &str) -> Option<NaiveTime> {
    let caps = TIME_OF_DAY_RE.captures(text)?;
    let hour = caps.get(2)?.as_str().parse::<u32>().ok()?;
    let minute = match caps.get(3) {
        Some(value) => value.as_str().parse::<u32>().ok()?,
        None => 0,
    };
    if !(1..=12).contains(&hour) {
        return None;
    }
    let is_pm = caps.get(4)?.as_str().eq_ignore_ascii_case("pm");
    let hour = match (is_pm, hour) {
        (false, 12) => 0,
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, h) => h,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn resolve_local(naive: NaiveDateTime, date: NaiveDate) -> Option<DateTime<Local>> {
    // Local wall times inside a DST gap do not exist; fall back to midnight.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| Local.from_local_datetime(&date.and_time(NaiveTime::MIN)).earliest())
}
