//! Public entry points: parsing context, construction options, presets.

use crate::engine;
use crate::error::Result;
use crate::{FlexInput, FlexTime, FormatTag, OutputFormat};
use chrono::{DateTime, TimeZone, Utc};

/// Parsing context.
///
/// Only the free-form fallback reads it: relative phrases such as
/// "next friday 8pm" resolve against `reference_time`.
#[derive(Debug, Clone)]
pub struct Context {
    /// Reference instant used to resolve relative expressions.
    pub reference_time: DateTime<Utc>,
    /// How ambiguous numeric dates (`04/05`) are read by the free-form parser.
    pub dialect: Dialect,
}

impl Default for Context {
    fn default() -> Self {
        if cfg!(test) {
            let reference_time = Utc.with_ymd_and_hms(2024, 1, 28, 10, 0, 0).single().unwrap_or_else(Utc::now);
            Self { reference_time, dialect: Dialect::Uk }
        } else {
            Self { reference_time: Utc::now(), dialect: Dialect::Uk }
        }
    }
}

/// Day/month ordering for the free-form parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `04/05` is the 4th of May.
    #[default]
    Uk,
    /// `04/05` is April 5th.
    Us,
}

/// How the mask of a freshly read value is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskPolicy {
    /// Fields given by the source are significant, everything else is masked.
    #[default]
    Inferred,
    /// Every field is significant, whatever the source carried.
    Full,
}

/// Construction options: the default output strategy and mask policy.
///
/// The policy only applies where a mask is inferred (strings, component
/// mappings, native values). Copies and envelopes keep their explicit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub output: OutputFormat,
    pub mask_policy: MaskPolicy,
}

/// Named configurations. They only fix [`Options`]; every preset shares the
/// same [`FlexTime`] behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Renders the significant fields as a mapping.
    Components,
    /// Renders the shortest canonical string.
    Minimal,
    /// Renders the full instant.
    Full,
    /// Renders the `{dt, mask}` envelope.
    #[default]
    Flex,
}

impl Preset {
    pub fn options(self) -> Options {
        let output = match self {
            Preset::Components => OutputFormat::Components,
            Preset::Minimal => OutputFormat::Minimal,
            Preset::Full => OutputFormat::Full,
            Preset::Flex => OutputFormat::Flex,
        };
        Options { output, mask_policy: MaskPolicy::Inferred }
    }
}

impl From<Preset> for Options {
    fn from(preset: Preset) -> Self {
        preset.options()
    }
}

/// Canonical tag of `input`.
///
/// Returns `Ok(None)` when no canonical shape matches but the free-form
/// parser accepts the string, and [`FlexError::InvalidFormat`](crate::FlexError::InvalidFormat)
/// when nothing accepts it.
///
/// # Example
/// ```
/// use flextime::{infer_format, FormatTag};
///
/// assert_eq!(infer_format("2023-06").unwrap(), Some(FormatTag::DashedMonth));
/// assert!(infer_format("202306").is_err());
/// ```
pub fn infer_format(input: &str) -> Result<Option<FormatTag>> {
    infer_format_with(input, &Context::default())
}

/// [`infer_format`] against an explicit [`Context`].
pub fn infer_format_with(input: &str, context: &Context) -> Result<Option<FormatTag>> {
    engine::infer_format(input, context)
}

/// Build a [`FlexTime`] with the default context and options.
///
/// # Example
/// ```
/// use flextime::parse;
///
/// let ft = parse("2023-06").unwrap();
/// assert_eq!(ft.mask_str(), "0011111");
/// assert_eq!(ft.to_minimal(), "2023-06");
/// ```
pub fn parse(input: impl Into<FlexInput>) -> Result<FlexTime> {
    parse_with(input, &Context::default(), &Options::default())
}

/// Build a [`FlexTime`] using the provided `context`/`options`.
///
/// Use this when you want deterministic free-form parsing by supplying a reference time.
pub fn parse_with(input: impl Into<FlexInput>, context: &Context, options: &Options) -> Result<FlexTime> {
    FlexTime::with_options(input, context, options)
}

/// Default configuration: envelope output, inferred mask.
pub fn flextime(input: impl Into<FlexInput>) -> Result<FlexTime> {
    preset(input, Preset::Flex)
}

/// [`Preset::Components`].
pub fn component_time(input: impl Into<FlexInput>) -> Result<FlexTime> {
    preset(input, Preset::Components)
}

/// [`Preset::Minimal`].
pub fn short_time(input: impl Into<FlexInput>) -> Result<FlexTime> {
    preset(input, Preset::Minimal)
}

/// [`Preset::Full`].
pub fn iso_time(input: impl Into<FlexInput>) -> Result<FlexTime> {
    preset(input, Preset::Full)
}

/// [`Preset::Flex`].
pub fn mask_time(input: impl Into<FlexInput>) -> Result<FlexTime> {
    preset(input, Preset::Flex)
}

fn preset(input: impl Into<FlexInput>, preset: Preset) -> Result<FlexTime> {
    parse_with(input, &Context::default(), &preset.options())
}
