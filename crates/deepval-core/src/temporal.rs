//! # Temporal Values — Parsing Dates, Times, and Instants
//!
//! Text-to-[`Value`] parsers for the three temporal kinds. Rules only ever
//! see typed temporal values: a date written as text in a JSON document is
//! text until the caller converts it, and `date()` helpers will reject it.
//!
//! ## Formats
//!
//! - **Date** — `YYYY-MM-DD`.
//! - **Time** — `HH:MM:SS` with optional fractional seconds.
//! - **DateTime** — RFC 3339. Any offset is accepted and converted to UTC,
//!   so two spellings of the same instant produce equal values.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::ValueError;
use crate::value::Value;

/// Parse a `YYYY-MM-DD` calendar date into [`Value::Date`].
pub fn parse_date(s: &str) -> Result<Value, ValueError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Value::Date)
        .map_err(|e| temporal_error("date", s, e))
}

/// Parse an `HH:MM:SS[.fraction]` time of day into [`Value::Time`].
pub fn parse_time(s: &str) -> Result<Value, ValueError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .map(Value::Time)
        .map_err(|e| temporal_error("time", s, e))
}

/// Parse an RFC 3339 timestamp into [`Value::DateTime`], converting the
/// offset to UTC.
pub fn parse_datetime(s: &str) -> Result<Value, ValueError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
        .map_err(|e| temporal_error("datetime", s, e))
}

fn temporal_error(kind: &'static str, input: &str, err: chrono::ParseError) -> ValueError {
    ValueError::Temporal {
        kind,
        input: input.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date() {
        let v = parse_date("2026-01-15").unwrap();
        assert_eq!(v, Value::Date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
    }

    #[test]
    fn test_parse_date_rejects_datetime_text() {
        assert!(parse_date("2026-01-15T12:00:00Z").is_err());
        assert!(parse_date("15/01/2026").is_err());
    }

    #[test]
    fn test_parse_time_with_and_without_fraction() {
        let plain = parse_time("12:30:45").unwrap();
        let frac = parse_time("12:30:45.250").unwrap();
        assert_eq!(plain, Value::Time(NaiveTime::from_hms_opt(12, 30, 45).unwrap()));
        assert_eq!(
            frac,
            Value::Time(NaiveTime::from_hms_milli_opt(12, 30, 45, 250).unwrap())
        );
    }

    #[test]
    fn test_parse_datetime_converts_offset() {
        let offset = parse_datetime("2026-01-15T17:00:00+05:00").unwrap();
        let zulu = parse_datetime("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(offset, zulu);
        assert_eq!(
            zulu,
            Value::DateTime(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_error_names_kind_and_input() {
        let err = parse_datetime("not-a-date").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid datetime \"not-a-date\""), "{msg}");
    }
}
