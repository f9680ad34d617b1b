//! Turning matched fields into an instant.
//!
//! Structural matches arrive as regex captures; component mappings arrive as
//! plain integers. Both end up in [`from_calendar_fields`], which is the only
//! place that asks `chrono` to validate a calendar value.

use crate::error::{FlexError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Captures;
use std::str::FromStr;

/// Build a naive date-time from calendar fields, `None` if any field is out of range.
pub(crate) fn from_calendar_fields(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nano: u32,
) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(hour, minute, second, nano)
}

/// Resolve the captures of a structural match. Shapes without an offset are read as UTC.
pub(crate) fn instant_from_captures(caps: &Captures<'_>, source: &str) -> Result<DateTime<Utc>> {
    let invalid = || FlexError::InvalidFormat(format!("'{source}' does not name a valid date-time"));

    let year: i32 = group(caps, "year").ok_or_else(invalid)?;
    let month = group(caps, "month").unwrap_or(1);
    let day = group(caps, "day").unwrap_or(1);
    let hour = group(caps, "hour").unwrap_or(0);
    let minute = group(caps, "minute").unwrap_or(0);
    let second = group(caps, "second").unwrap_or(0);
    let nano = match caps.name("fraction") {
        Some(m) => fraction_nanos(m.as_str()).ok_or_else(invalid)?,
        None => 0,
    };

    let naive = from_calendar_fields(year, month, day, hour, minute, second, nano).ok_or_else(invalid)?;

    let offset = match caps.name("offset") {
        Some(m) => parse_offset(m.as_str()).ok_or_else(invalid)?,
        None => FixedOffset::east_opt(0).ok_or_else(invalid)?,
    };

    offset.from_local_datetime(&naive).single().map(|dt| dt.with_timezone(&Utc)).ok_or_else(invalid)
}

fn group<T: FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name)?.as_str().parse().ok()
}

/// `"123"` -> 123_000_000, `"123456"` -> 123_456_000.
fn fraction_nanos(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.len() > 9 {
        return None;
    }
    let value: u32 = digits.parse().ok()?;
    Some(value * 10u32.pow(9 - digits.len() as u32))
}

/// `Z`, `+HH:MM` or `-HH:MM`.
fn parse_offset(marker: &str) -> Option<FixedOffset> {
    if marker == "Z" {
        return FixedOffset::east_opt(0);
    }
    let sign = match marker.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let (hours, minutes) = marker.get(1..)?.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn fraction_scales_to_nanoseconds() {
        assert_eq!(fraction_nanos("123"), Some(123_000_000));
        assert_eq!(fraction_nanos("123456"), Some(123_456_000));
        assert_eq!(fraction_nanos(""), None);
    }

    #[test]
    fn offsets_parse_both_markers() {
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!(parse_offset("-02:00").unwrap().local_minus_utc(), -2 * 3600);
        assert!(parse_offset("+24:00").is_none());
        assert!(parse_offset("05:00").is_none());
    }

    #[test]
    fn calendar_fields_are_validated() {
        assert!(from_calendar_fields(2023, 2, 29, 0, 0, 0, 0).is_none());
        assert!(from_calendar_fields(2024, 2, 29, 0, 0, 0, 0).is_some());
        assert!(from_calendar_fields(2023, 13, 1, 0, 0, 0, 0).is_none());
        assert!(from_calendar_fields(2023, 1, 1, 24, 0, 0, 0).is_none());
    }

    #[test]
    fn captures_with_offset_normalize_to_utc() {
        let (_, caps) = crate::engine::table::match_structural("2023-06-29T01:00:00+02:00").unwrap();
        let instant = instant_from_captures(&caps, "2023-06-29T01:00:00+02:00").unwrap();
        assert_eq!((instant.day(), instant.hour()), (28, 23));
    }
}
