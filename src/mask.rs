//! Precision masks.
//!
//! A mask is a fixed 7-slot record over the calendar/clock fields
//!
//! ```text
//! year month day hour minute second millisecond
//!  0     0    1   1     1      1        1        <- "0011111"
//! ```
//!
//! where a set slot means the field is *masked out* (insignificant) and a clear
//! slot means it takes part in equality and display. The slot order is fixed and
//! is the order of the binary string form.
//!
//! Internally the slots are a `bitflags` set, so field names are checked at
//! compile time. String keys only appear at the deserialization boundary
//! ([`Field::from_str`], [`MaskFields`], [`binary_to_mask`]), which is where
//! [`FlexError::InvalidMask`] can be raised.

use crate::error::{FlexError, Result};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One calendar/clock field, ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl Field {
    /// All fields in mask (and binary string) order.
    pub const ALL: [Field; 7] =
        [Field::Year, Field::Month, Field::Day, Field::Hour, Field::Minute, Field::Second, Field::Millisecond];

    pub fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Millisecond => "millisecond",
        }
    }

    /// Position of the field in the binary string.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn flag(self) -> FieldSet {
        FieldSet::from_bits_truncate(1 << self.index())
    }

    /// Read this field out of an instant (UTC).
    pub fn extract(self, instant: &DateTime<Utc>) -> i64 {
        match self {
            Field::Year => instant.year() as i64,
            Field::Month => instant.month() as i64,
            Field::Day => instant.day() as i64,
            Field::Hour => instant.hour() as i64,
            Field::Minute => instant.minute() as i64,
            Field::Second => instant.second() as i64,
            // Leap seconds carry nanos >= 1e9; keep the value inside 0..1000.
            Field::Millisecond => (instant.nanosecond() / 1_000_000 % 1_000) as i64,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FlexError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| FlexError::InvalidMask(format!("unknown mask field '{s}'")))
    }
}

bitflags::bitflags! {
    /// A set of [`Field`]s. Bit `n` is `Field::ALL[n]`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldSet: u8 {
        const YEAR        = 1 << 0;
        const MONTH       = 1 << 1;
        const DAY         = 1 << 2;
        const HOUR        = 1 << 3;
        const MINUTE      = 1 << 4;
        const SECOND      = 1 << 5;
        const MILLISECOND = 1 << 6;
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        iter.into_iter().fold(FieldSet::empty(), |set, field| set | field.flag())
    }
}

/// Which fields are masked out. `Default` masks nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrecisionMask(FieldSet);

impl Default for PrecisionMask {
    fn default() -> Self {
        PrecisionMask::clear()
    }
}

impl PrecisionMask {
    /// Nothing masked: every field is significant.
    pub const fn clear() -> Self {
        PrecisionMask(FieldSet::empty())
    }

    /// Every field masked out.
    pub const fn all() -> Self {
        PrecisionMask(FieldSet::all())
    }

    /// Mask for a source that carries every field up to and including
    /// `precision`; finer fields are masked out.
    pub fn up_to(precision: Field) -> Self {
        Field::ALL.into_iter().filter(|f| *f > precision).collect::<FieldSet>().into()
    }

    /// Mask for a source that carries exactly `present`.
    pub fn from_present(present: FieldSet) -> Self {
        PrecisionMask(present.complement())
    }

    pub fn masked(&self) -> FieldSet {
        self.0
    }

    pub fn is_masked(&self, field: Field) -> bool {
        self.0.contains(field.flag())
    }

    pub fn is_significant(&self, field: Field) -> bool {
        !self.is_masked(field)
    }

    /// Significant fields, coarse to fine.
    pub fn significant(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|f| self.is_significant(*f))
    }

    /// Finest significant field, if any.
    pub fn precision(&self) -> Option<Field> {
        self.significant().last()
    }

    /// Union: a field is masked if either side masks it.
    pub fn union(self, other: PrecisionMask) -> PrecisionMask {
        self | other
    }

    /// Assign the given slots; slots not mentioned are left untouched.
    pub fn apply_mask(&mut self, flags: impl IntoIterator<Item = (Field, bool)>) -> &mut Self {
        for (field, masked) in flags {
            self.0.set(field.flag(), masked);
        }
        self
    }

    /// Unmask every slot.
    pub fn clear_mask(&mut self) -> &mut Self {
        self.0 = FieldSet::empty();
        self
    }

    /// Same assignment semantics as [`apply_mask`](Self::apply_mask): the
    /// given values are written, not negated.
    pub fn toggle_mask(&mut self, flags: impl IntoIterator<Item = (Field, bool)>) -> &mut Self {
        self.apply_mask(flags)
    }

    /// Mask every slot except `fields`, which become significant.
    pub fn use_only(&mut self, fields: impl IntoIterator<Item = Field>) -> &mut Self {
        let keep: FieldSet = fields.into_iter().collect();
        self.0 = keep.complement();
        self
    }

    pub fn to_binary(&self) -> String {
        Field::ALL.into_iter().map(|f| if self.is_masked(f) { '1' } else { '0' }).collect()
    }

    pub fn from_binary(s: &str) -> Result<Self> {
        if s.chars().count() != Field::ALL.len() {
            return Err(FlexError::InvalidMask(format!("expected 7 binary digits, got '{s}'")));
        }
        let mut mask = PrecisionMask::clear();
        for (field, c) in Field::ALL.into_iter().zip(s.chars()) {
            let masked = match c {
                '1' => true,
                '0' => false,
                other => return Err(FlexError::InvalidMask(format!("unexpected character '{other}' in '{s}'"))),
            };
            mask.0.set(field.flag(), masked);
        }
        Ok(mask)
    }
}

impl From<FieldSet> for PrecisionMask {
    fn from(masked: FieldSet) -> Self {
        PrecisionMask(masked)
    }
}

impl std::ops::BitOr for PrecisionMask {
    type Output = PrecisionMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        PrecisionMask(self.0 | rhs.0)
    }
}

impl fmt::Display for PrecisionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_binary())
    }
}

impl FromStr for PrecisionMask {
    type Err = FlexError;

    fn from_str(s: &str) -> Result<Self> {
        PrecisionMask::from_binary(s)
    }
}

/// Render a mask as 7 characters, `'1'` = masked out.
pub fn mask_to_binary(mask: &PrecisionMask) -> String {
    mask.to_binary()
}

/// Exact inverse of [`mask_to_binary`].
pub fn binary_to_mask(s: &str) -> Result<PrecisionMask> {
    PrecisionMask::from_binary(s)
}

/// The 7-key boolean mapping form of a mask.
///
/// All keys are required and unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaskFields {
    pub year: bool,
    pub month: bool,
    pub day: bool,
    pub hour: bool,
    pub minute: bool,
    pub second: bool,
    pub millisecond: bool,
}

impl From<PrecisionMask> for MaskFields {
    fn from(mask: PrecisionMask) -> Self {
        MaskFields {
            year: mask.is_masked(Field::Year),
            month: mask.is_masked(Field::Month),
            day: mask.is_masked(Field::Day),
            hour: mask.is_masked(Field::Hour),
            minute: mask.is_masked(Field::Minute),
            second: mask.is_masked(Field::Second),
            millisecond: mask.is_masked(Field::Millisecond),
        }
    }
}

impl From<MaskFields> for PrecisionMask {
    fn from(m: MaskFields) -> Self {
        let mut mask = PrecisionMask::clear();
        mask.apply_mask([
            (Field::Year, m.year),
            (Field::Month, m.month),
            (Field::Day, m.day),
            (Field::Hour, m.hour),
            (Field::Minute, m.minute),
            (Field::Second, m.second),
            (Field::Millisecond, m.millisecond),
        ]);
        mask
    }
}

impl TryFrom<&serde_json::Value> for PrecisionMask {
    type Error = FlexError;

    /// Decode either the binary string or the boolean mapping.
    fn try_from(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => PrecisionMask::from_binary(s),
            serde_json::Value::Object(_) => MaskFields::deserialize(value)
                .map(PrecisionMask::from)
                .map_err(|e| FlexError::InvalidMask(e.to_string())),
            other => Err(FlexError::InvalidMask(format!("expected a binary string or a field mapping, got {other}"))),
        }
    }
}

impl Serialize for PrecisionMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_binary())
    }
}

impl<'de> Deserialize<'de> for PrecisionMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        PrecisionMask::try_from(&value).map_err(serde::de::Error::custom)
    }
}
