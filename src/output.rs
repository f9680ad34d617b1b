//! Output strategies.
//!
//! | strategy     | rendering                                              |
//! |--------------|--------------------------------------------------------|
//! | `Components` | mapping of the significant fields only                 |
//! | `Minimal`    | shortest canonical string up to the finest significant |
//! | `Full`       | the whole instant, mask ignored                        |
//! | `Flex`       | `{dt: <full>, mask: <binary>}`                         |

use crate::error::{FlexError, Result};
use crate::mask::{Field, PrecisionMask};
use crate::{FlexTime, FormatTag};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    Components,
    Minimal,
    Full,
    #[default]
    Flex,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Components => "components",
            OutputFormat::Minimal => "minimal",
            OutputFormat::Full => "full",
            OutputFormat::Flex => "flex",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = FlexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "components" => Ok(OutputFormat::Components),
            "minimal" | "short" => Ok(OutputFormat::Minimal),
            "full" | "datetime" | "iso" => Ok(OutputFormat::Full),
            "flex" | "mask" => Ok(OutputFormat::Flex),
            other => Err(FlexError::InvalidFormat(format!("unknown output format '{other}'"))),
        }
    }
}

/// Calendar/clock components. As an input every key is optional except
/// `year`; as an output only significant fields are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Components {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub millisecond: Option<u32>,
}

impl Components {
    pub fn get(&self, field: Field) -> Option<i64> {
        match field {
            Field::Year => self.year.map(i64::from),
            Field::Month => self.month.map(i64::from),
            Field::Day => self.day.map(i64::from),
            Field::Hour => self.hour.map(i64::from),
            Field::Minute => self.minute.map(i64::from),
            Field::Second => self.second.map(i64::from),
            Field::Millisecond => self.millisecond.map(i64::from),
        }
    }

    fn set(&mut self, field: Field, value: i64) {
        // Field values extracted from a chrono instant always fit.
        match field {
            Field::Year => self.year = i32::try_from(value).ok(),
            Field::Month => self.month = u32::try_from(value).ok(),
            Field::Day => self.day = u32::try_from(value).ok(),
            Field::Hour => self.hour = u32::try_from(value).ok(),
            Field::Minute => self.minute = u32::try_from(value).ok(),
            Field::Second => self.second = u32::try_from(value).ok(),
            Field::Millisecond => self.millisecond = u32::try_from(value).ok(),
        }
    }
}

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

/// The `{dt, mask}` form: full instant string plus binary mask.
///
/// On input, `mask` may also be the 7-key boolean mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub dt: String,
    pub mask: PrecisionMask,
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FlexTime {
    /// Significant fields and their values.
    pub fn to_components(&self) -> Components {
        let mut components = Components::default();
        for field in self.mask().significant() {
            components.set(field, self.get(field));
        }
        components
    }

    /// Shortest canonical string covering every significant field.
    pub fn to_minimal(&self) -> String {
        let precision = self.mask().precision().unwrap_or(Field::Year);
        FormatTag::minimal_for(precision).render(self.instant())
    }

    /// RFC 3339 with `+00:00`; fraction digits only when non-zero.
    pub fn to_full(&self) -> String {
        self.instant().to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }

    pub fn to_flex(&self) -> Envelope {
        Envelope { dt: self.to_full(), mask: self.mask() }
    }

    /// Render with an explicit strategy, ignoring the stored one.
    pub fn to_str(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Components => self.to_components().to_string(),
            OutputFormat::Minimal => self.to_minimal(),
            OutputFormat::Full => self.to_full(),
            OutputFormat::Flex => self.to_flex().to_string(),
        }
    }
}

impl fmt::Display for FlexTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str(self.output()))
    }
}
