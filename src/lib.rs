//! Partial-precision date-times.
//!
//! A [`FlexTime`] is a UTC instant plus a [`PrecisionMask`] saying which of its
//! seven fields (year through millisecond) are meaningful. `"2023-06"` reads
//! as June 2023 with day and clock masked; two values compare equal when they
//! agree on every field neither side masks.
//!
//! ```
//! use flextime::{Field, FlexTime};
//!
//! let mut a = FlexTime::new("2023-06-15").unwrap();
//! let b = FlexTime::new("2023-06-20").unwrap();
//! assert_ne!(a, b);
//!
//! a.apply_mask([(Field::Day, true)]);
//! assert_eq!(a, b);
//! assert_eq!(a.to_minimal(), "2023-06");
//! ```
//!
//! ## Layout
//!
//! - `engine`: structural pattern table plus free-form fallback; turns a string
//!   into an instant, a default mask and (for canonical shapes) a [`FormatTag`].
//! - `input`: construction dispatch over every accepted [`FlexInput`] shape.
//! - `flex`: the value itself, with equality and ordering.
//! - `output` / `serialize`: rendering strategies and persistence.
//! - `api`: [`Context`], [`Options`], [`Preset`] and the preset constructors.

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod flex;
mod format;
mod input;
mod mask;
mod output;
mod serialize;

pub use api::{
    Context, Dialect, MaskPolicy, Options, Preset, component_time, flextime, infer_format, infer_format_with,
    iso_time, mask_time, parse, parse_with, short_time,
};
pub use engine::{FallbackStage, FormatRule, Inference};
pub use error::{FlexError, Result};
pub use flex::FlexTime;
pub use format::FormatTag;
pub use input::{FlexInput, NativeValue};
pub use mask::{Field, FieldSet, MaskFields, PrecisionMask, binary_to_mask, mask_to_binary};
pub use output::{Components, Envelope, OutputFormat};
pub use serialize::{DumpMode, from_json, lossy, to_json};

/// Read `input` without building a value: instant, default mask and tag.
pub fn inspect(input: &str, context: &Context) -> Result<Inference> {
    engine::read(input, context)
}
