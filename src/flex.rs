//! The partial-precision value.
//!
//! A [`FlexTime`] pairs a fully resolved UTC instant with a [`PrecisionMask`].
//! The mask never truncates the instant: it only decides which fields take
//! part in equality and display, so masking and unmasking a field
//! loses nothing.
//!
//! ## Equality
//!
//! ```text
//! a == b  <=>  for every field f not in (a.mask | b.mask):
//!                  f(a.instant) == f(b.instant)
//! ```
//!
//! Masking is symmetric and monotonic: masking another field on either side
//! can only turn an unequal pair equal, never the reverse. Because of this,
//! equality is not transitive across different masks, so `FlexTime` is
//! `PartialEq`/`PartialOrd` only.
//!
//! ## Ordering
//!
//! `<`, `<=`, ... compare the UTC instants directly and ignore both masks.
//! Two values can therefore be `==` under their masks while one still sorts
//! before the other.
//!
//! ## Threading
//!
//! Plain `Copy` data with no interior mutability. Sharing across threads is
//! fine; mutating one instance from several threads at once is the caller's
//! business.

use crate::api::{Context, Options};
use crate::error::Result;
use crate::input::{self, FlexInput};
use crate::mask::{Field, PrecisionMask};
use crate::output::OutputFormat;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::trace;

#[derive(Debug, Clone, Copy)]
pub struct FlexTime {
    instant: DateTime<Utc>,
    mask: PrecisionMask,
    output: OutputFormat,
}

impl FlexTime {
    /// Build from any accepted input shape with the default context and options.
    pub fn new(input: impl Into<FlexInput>) -> Result<Self> {
        Self::with_options(input, &Context::default(), &Options::default())
    }

    pub fn with_options(input: impl Into<FlexInput>, context: &Context, options: &Options) -> Result<Self> {
        input::construct(input.into(), context, options)
    }

    pub(crate) fn from_parts(instant: DateTime<Utc>, mask: PrecisionMask, output: OutputFormat) -> Self {
        FlexTime { instant, mask, output }
    }

    /// The current instant, every field significant.
    pub fn now() -> Self {
        FlexTime::from_parts(Utc::now(), PrecisionMask::clear(), OutputFormat::default())
    }

    pub fn instant(&self) -> &DateTime<Utc> {
        &self.instant
    }

    pub fn mask(&self) -> PrecisionMask {
        self.mask
    }

    /// The mask as its 7-character binary string.
    pub fn mask_str(&self) -> String {
        self.mask.to_binary()
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn set_output(&mut self, output: OutputFormat) -> &mut Self {
        self.output = output;
        self
    }

    /// Raw value of `field`, whether masked or not.
    pub fn get(&self, field: Field) -> i64 {
        field.extract(&self.instant)
    }

    pub fn year(&self) -> i32 {
        self.get(Field::Year) as i32
    }

    pub fn month(&self) -> u32 {
        self.get(Field::Month) as u32
    }

    pub fn day(&self) -> u32 {
        self.get(Field::Day) as u32
    }

    pub fn hour(&self) -> u32 {
        self.get(Field::Hour) as u32
    }

    pub fn minute(&self) -> u32 {
        self.get(Field::Minute) as u32
    }

    pub fn second(&self) -> u32 {
        self.get(Field::Second) as u32
    }

    pub fn millisecond(&self) -> u32 {
        self.get(Field::Millisecond) as u32
    }

    pub fn is_significant(&self, field: Field) -> bool {
        self.mask.is_significant(field)
    }

    /// Finest significant field.
    pub fn precision(&self) -> Option<Field> {
        self.mask.precision()
    }

    pub fn apply_mask(&mut self, flags: impl IntoIterator<Item = (Field, bool)>) -> &mut Self {
        self.mask.apply_mask(flags);
        trace!(mask = %self.mask, "apply_mask");
        self
    }

    pub fn clear_mask(&mut self) -> &mut Self {
        self.mask.clear_mask();
        trace!(mask = %self.mask, "clear_mask");
        self
    }

    /// Assigns like [`apply_mask`](Self::apply_mask); values are not negated.
    pub fn toggle_mask(&mut self, flags: impl IntoIterator<Item = (Field, bool)>) -> &mut Self {
        self.mask.toggle_mask(flags);
        trace!(mask = %self.mask, "toggle_mask");
        self
    }

    pub fn use_only(&mut self, fields: impl IntoIterator<Item = Field>) -> &mut Self {
        self.mask.use_only(fields);
        trace!(mask = %self.mask, "use_only");
        self
    }

    /// Fields that neither side masks, coarse to fine.
    fn shared_fields(&self, other: &FlexTime) -> impl Iterator<Item = Field> {
        let union = self.mask | other.mask;
        Field::ALL.into_iter().filter(move |f| union.is_significant(*f))
    }
}

impl Default for FlexTime {
    fn default() -> Self {
        FlexTime::now()
    }
}

impl PartialEq for FlexTime {
    fn eq(&self, other: &Self) -> bool {
        self.shared_fields(other).all(|f| self.get(f) == other.get(f))
    }
}

impl PartialOrd for FlexTime {
    /// Orders by the UTC instants; masks play no part.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.instant.partial_cmp(&other.instant)
    }
}
