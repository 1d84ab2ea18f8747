//! Parsing and formatting of the compact due-date representation.
//!
//! Tasks store their due date as `DD-MM-YY` (two-digit year in the 2000s) or
//! as the composite `DD-MM-YYThh:mm` when a time of day was attached. All
//! values are local wall-clock; there is no timezone handling. Every function
//! here is total: malformed input yields `None` (or an error at the
//! validation boundary), never a panic.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

/// Surfaced when a due date typed into an edit form fails the shape check.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Please enter date in DD-MM-YY format")]
pub struct InvalidDueDate;

/// Shape check for `DD-MM-YY`: two digits, hyphen, two digits, hyphen, two
/// digits. Shape only; `99-99-99` passes here and fails later when parsed.
fn is_compact_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 8
        && b[0].is_ascii_digit()
        && b[1].is_ascii_digit()
        && b[2] == b'-'
        && b[3].is_ascii_digit()
        && b[4].is_ascii_digit()
        && b[5] == b'-'
        && b[6].is_ascii_digit()
        && b[7].is_ascii_digit()
}

/// Shape check for `hh:mm`: two digits, colon, two digits.
fn is_hhmm(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 5
        && b[0].is_ascii_digit()
        && b[1].is_ascii_digit()
        && b[2] == b':'
        && b[3].is_ascii_digit()
        && b[4].is_ascii_digit()
}

/// Parse a strict `hh:mm` time-of-day string.
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    if !is_hhmm(raw) {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

fn parse_compact_date(raw: &str) -> Option<NaiveDate> {
    if !is_compact_date(raw) {
        return None;
    }
    let day: u32 = raw[0..2].parse().ok()?;
    let month: u32 = raw[3..5].parse().ok()?;
    let year: i32 = raw[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

/// Parse a stored due date into a local date-time.
///
/// Accepts `DD-MM-YY`, `DD-MM-YYThh:mm`, or a handful of general formats as
/// a fallback. A composite whose time part is malformed is honored date-only
/// at midnight (the time portion is silently dropped). Returns `None` for
/// anything unparseable.
pub fn parse_due_date(raw: &str) -> Option<NaiveDateTime> {
    let (date_part, time_part) = match raw.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (raw, None),
    };

    if let Some(date) = parse_compact_date(date_part) {
        let time = time_part.and_then(parse_hhmm).unwrap_or(NaiveTime::MIN);
        return Some(date.and_time(time));
    }

    // Fallback for non-compact inputs, e.g. ISO dates pasted by hand.
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    None
}

/// Date-only view of [`parse_due_date`], used by day-granularity queries.
pub fn parse_due_day(raw: &str) -> Option<NaiveDate> {
    parse_due_date(raw).map(|dt| dt.date())
}

/// Format a calendar date back into the compact `DD-MM-YY` token.
/// Round-trips with [`parse_due_day`] for years 2000-2099.
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%d-%m-%y").to_string()
}

/// Combine a stored due date with an `hh:mm` reminder time into the moment
/// the reminder should fire. The reminder time wins over any time of day
/// embedded in a composite due date.
pub fn combine_reminder(due_date: &str, reminder_time: &str) -> Option<NaiveDateTime> {
    let date = parse_due_day(due_date)?;
    let time = parse_hhmm(reminder_time)?;
    Some(date.and_time(time))
}

/// Monday-first day index (`0..=6`, Monday = 0, Sunday = 6).
///
/// Every grid computation uses this remap; call sites must not re-derive it
/// from a Sunday-first index.
pub fn monday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// Edit-form validation for a typed due date: shape check only, matching the
/// form's `^\d{2}-\d{2}-\d{2}$` rule. Impossible-but-well-shaped dates pass
/// validation and later fall out of derived views as unparseable.
pub fn validate_due_date_input(raw: &str) -> Result<(), InvalidDueDate> {
    if is_compact_date(raw) {
        Ok(())
    } else {
        Err(InvalidDueDate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parses_compact_date_at_midnight() {
        let dt = parse_due_date("15-06-24").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn parses_composite_date_time() {
        let dt = parse_due_date("15-06-24T09:30").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn malformed_time_part_is_dropped() {
        let dt = parse_due_date("15-06-24T9:30").unwrap();
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());

        let dt = parse_due_date("15-06-24Tlater").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn unparseable_input_yields_none() {
        assert_eq!(parse_due_date("invalid-date"), None);
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("32-13-24"), None);
        assert_eq!(parse_due_date("99-99-99"), None);
    }

    #[test]
    fn iso_fallback_is_accepted() {
        let dt = parse_due_date("2024-06-15").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

        let dt = parse_due_date("2024-06-15T09:30").unwrap();
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn format_parse_round_trip_preserves_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let token = format_due_date(date);
        assert_eq!(token, "29-02-24");
        assert_eq!(parse_due_day(&token), Some(date));
        assert_eq!(parse_due_day(&token).unwrap().year() % 100, 24);
    }

    #[test]
    fn combines_reminder_time_with_due_date() {
        let at = combine_reminder("15-06-24", "08:45").unwrap();
        assert_eq!(at.date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert_eq!(at.time(), NaiveTime::from_hms_opt(8, 45, 0).unwrap());

        // Reminder time overrides the embedded time of a composite due date.
        let at = combine_reminder("15-06-24T13:00", "08:45").unwrap();
        assert_eq!(at.time(), NaiveTime::from_hms_opt(8, 45, 0).unwrap());

        assert_eq!(combine_reminder("15-06-24", "8:45"), None);
        assert_eq!(combine_reminder("nope", "08:45"), None);
    }

    #[test]
    fn monday_index_remaps_sunday_last() {
        assert_eq!(monday_index(Weekday::Mon), 0);
        assert_eq!(monday_index(Weekday::Wed), 2);
        assert_eq!(monday_index(Weekday::Sat), 5);
        assert_eq!(monday_index(Weekday::Sun), 6);
    }

    #[test]
    fn validation_checks_shape_only() {
        assert!(validate_due_date_input("15-06-24").is_ok());
        // Matches the form rule: shape passes even when the date is impossible.
        assert!(validate_due_date_input("99-99-99").is_ok());
        assert_eq!(validate_due_date_input("15/06/24"), Err(InvalidDueDate));
        assert_eq!(validate_due_date_input("15-06-2024"), Err(InvalidDueDate));
        assert_eq!(validate_due_date_input("15-06-24T09:30"), Err(InvalidDueDate));
    }

    #[test]
    fn parses_strict_hhmm_only() {
        assert_eq!(parse_hhmm("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_hhmm("9:30"), None);
        assert_eq!(parse_hhmm("25:00"), None);
        assert_eq!(parse_hhmm("09:30:00"), None);
    }
}
