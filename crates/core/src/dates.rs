//! Calendar helpers for wire dates, ages and display strings.
//!
//! Dates cross the wire as `YYYY-MM-DD` and are held as [`NaiveDate`], which carries no
//! timezone, so a client behind UTC can never shift a birthday by a day.

use crate::error::{FormError, FormResult};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Utc};

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The calendar day on the machine running the client.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one day.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_ymd(value: &str) -> FormResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| FormError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parses either a `YYYY-MM-DD` date or an ISO datetime.
///
/// Datetimes with an offset are converted to UTC before the date is taken; datetimes without
/// one are read as-is.
pub fn parse_wire_date(value: &str) -> FormResult<NaiveDate> {
    let value = value.trim();
    if !value.contains('T') {
        return parse_ymd(value);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.date())
        .map_err(|e| FormError::InvalidDate {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Whole years between `dob` and `today`.
///
/// `today.year - dob.year`, minus one when today's month/day falls before the birthday.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> FormResult<u32> {
    if dob > today {
        return Err(FormError::BirthDateInFuture { dob, today });
    }
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    Ok(years as u32)
}

/// `"January 1, 2025"`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `"January 2025"`.
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Formats a wire date string for display, passing unparseable input through unchanged.
pub fn display_wire_date(value: &str) -> String {
    parse_wire_date(value)
        .map(format_display_date)
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(s: &str) -> NaiveDate {
        parse_ymd(s).unwrap()
    }

    #[test]
    fn age_is_one_less_the_day_before_birthday() {
        let dob = ymd("2000-06-15");
        assert_eq!(age_on(dob, ymd("2025-06-14")).unwrap(), 24);
        assert_eq!(age_on(dob, ymd("2025-06-15")).unwrap(), 25);
    }

    #[test]
    fn leap_day_birthday_counts_from_march_first() {
        let dob = ymd("2004-02-29");
        assert_eq!(age_on(dob, ymd("2025-02-28")).unwrap(), 20);
        assert_eq!(age_on(dob, ymd("2025-03-01")).unwrap(), 21);
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let err = age_on(ymd("2030-01-01"), ymd("2025-01-01")).expect_err("future dob");
        assert!(matches!(err, FormError::BirthDateInFuture { .. }));
    }

    #[test]
    fn new_year_renders_without_shift() {
        assert_eq!(format_display_date(ymd("2025-01-01")), "January 1, 2025");
        assert_eq!(format_month_year(ymd("2025-01-01")), "January 2025");
    }

    #[test]
    fn wire_datetimes_use_utc_date() {
        assert_eq!(
            parse_wire_date("2025-01-01T02:30:00-05:00").unwrap(),
            ymd("2025-01-01")
        );
        assert_eq!(
            parse_wire_date("2024-12-31T23:30:00-05:00").unwrap(),
            ymd("2025-01-01")
        );
        assert_eq!(
            parse_wire_date("2025-03-09T10:00:00.123").unwrap(),
            ymd("2025-03-09")
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_ymd("01/02/2025").is_err());
        assert!(parse_ymd("2025-02-30").is_err());
        assert_eq!(display_wire_date("soon"), "soon");
    }

    #[test]
    fn fixed_clock_returns_its_day() {
        assert_eq!(FixedClock(ymd("2025-06-14")).today(), ymd("2025-06-14"));
    }
}
