//! Free-form fallback.
//!
//! When no structural row matches, the string is handed to the external
//! date/time engine, stage by stage:
//!
//! ```text
//! input ──┬─ bare digit run?   -> rejected (no free-form reading of "202306")
//!         ├─ chrono RFC 3339   -> any fraction width, 't' or ' ' separator
//!         ├─ chrono RFC 2822   -> "Thu, 29 Jun 2023 14:55:30 +0000"
//!         ├─ month and day     -> "Aug 28", "28 August 2023"; year from Context
//!         └─ chrono-english    -> "next friday 8pm", relative to Context
//! ```
//!
//! The phrase is handed to chrono-english with a standalone `at` connector
//! dropped, so "next thursday at 2pm" reads like "next thursday 2pm".
//!
//! A value accepted here carries no canonical tag.

use super::resolve::from_calendar_fields;
use crate::error::{FlexError, Result};
use crate::{Context, Dialect};
use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Captures;
use std::collections::HashMap;
use std::fmt;

/// Which fallback stage accepted the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStage {
    Rfc3339,
    Rfc2822,
    MonthDay,
    English,
}

impl fmt::Display for FallbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FallbackStage::Rfc3339 => "rfc3339",
            FallbackStage::Rfc2822 => "rfc2822",
            FallbackStage::MonthDay => "month-day",
            FallbackStage::English => "english",
        };
        f.write_str(name)
    }
}

pub(crate) fn parse_free_form(input: &str, context: &Context) -> Result<(DateTime<Utc>, FallbackStage)> {
    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FlexError::InvalidFormat(format!("'{input}' matches no canonical pattern")));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok((dt.with_timezone(&Utc), FallbackStage::Rfc3339));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Ok((dt.with_timezone(&Utc), FallbackStage::Rfc2822));
    }
    if let Some(dt) = month_day(input, context)? {
        return Ok((dt, FallbackStage::MonthDay));
    }

    let phrase = regex!(r"(?i)\s+at\s+").replace_all(input, " ");
    chrono_english::parse_date_string(&phrase, context.reference_time, english_dialect(context.dialect))
        .map(|dt| (dt, FallbackStage::English))
        .map_err(|err| FlexError::InvalidFormat(format!("'{input}' could not be parsed: {err}")))
}

static MONTH_NAME: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("january", 1),
        ("jan", 1),
        ("february", 2),
        ("feb", 2),
        ("march", 3),
        ("mar", 3),
        ("april", 4),
        ("apr", 4),
        ("may", 5),
        ("june", 6),
        ("jun", 6),
        ("july", 7),
        ("jul", 7),
        ("august", 8),
        ("aug", 8),
        ("september", 9),
        ("sept", 9),
        ("sep", 9),
        ("october", 10),
        ("oct", 10),
        ("november", 11),
        ("nov", 11),
        ("december", 12),
        ("dec", 12),
    ])
});

/// A calendar day named by month word and day number, with an optional year.
///
/// `Ok(None)` when the input is not that shape or the word is not a month.
/// A month word with an impossible day is an error, not a fall-through.
fn month_day(input: &str, context: &Context) -> Result<Option<DateTime<Utc>>> {
    let month_first = regex!(
        r"(?i)^(?P<month>[a-z]+)\.?\s+(?P<day>[0-9]{1,2})(?:st|nd|rd|th)?(?:,?\s+(?P<year>[0-9]{4}))?$"
    );
    let day_first = regex!(
        r"(?i)^(?P<day>[0-9]{1,2})(?:st|nd|rd|th)?\s+(?P<month>[a-z]+)\.?(?:,?\s+(?P<year>[0-9]{4}))?$"
    );

    let Some(caps) = month_first.captures(input).or_else(|| day_first.captures(input)) else {
        return Ok(None);
    };
    let Some(&month) = MONTH_NAME.get(caps["month"].to_ascii_lowercase().as_str()) else {
        return Ok(None);
    };

    let invalid = || FlexError::InvalidFormat(format!("'{input}' does not name a valid date"));
    let day: u32 = number(&caps, "day").ok_or_else(invalid)?;
    let year: i32 = match caps.name("year") {
        Some(_) => number(&caps, "year").ok_or_else(invalid)?,
        None => context.reference_time.year(),
    };

    let naive = from_calendar_fields(year, month, day, 0, 0, 0, 0).ok_or_else(invalid)?;
    Ok(Some(naive.and_utc()))
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name)?.as_str().parse().ok()
}

fn english_dialect(dialect: Dialect) -> chrono_english::Dialect {
    match dialect {
        Dialect::Uk => chrono_english::Dialect::Uk,
        Dialect::Us => chrono_english::Dialect::Us,
    }
}
