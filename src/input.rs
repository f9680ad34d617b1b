//! Construction dispatch.
//!
//! Every accepted input shape is a [`FlexInput`] variant, resolved in this
//! priority order:
//!
//! ```text
//! Flex        copy instant + mask
//! Native      chrono value; a bare date masks the clock fields
//! Envelope    {dt, mask}: dt read as text, mask decoded as given
//! Components  {year, month?, ...}: absent fields default low and are masked
//! Text        canonical shape or free-form string
//! ```
//!
//! Untyped data (JSON, or anything that deserializes through
//! `serde_json::Value`) is sorted into these shapes by
//! `TryFrom<&serde_json::Value>`; any other shape is an
//! [`FlexError::InvalidComponent`].

use crate::api::{Context, MaskPolicy, Options};
use crate::engine::{self, from_calendar_fields};
use crate::error::{FlexError, Result};
use crate::mask::{Field, FieldSet, PrecisionMask};
use crate::output::{Components, Envelope};
use crate::FlexTime;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::ops::RangeInclusive;
use tracing::debug;

/// A native `chrono` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeValue {
    /// A calendar date with no clock part.
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

/// Every shape a [`FlexTime`] can be built from.
#[derive(Debug, Clone)]
pub enum FlexInput {
    Flex(FlexTime),
    Native(NativeValue),
    Envelope(Envelope),
    Components(Components),
    Text(String),
}

impl From<FlexTime> for FlexInput {
    fn from(value: FlexTime) -> Self {
        FlexInput::Flex(value)
    }
}

impl From<&FlexTime> for FlexInput {
    fn from(value: &FlexTime) -> Self {
        FlexInput::Flex(*value)
    }
}

impl From<NativeValue> for FlexInput {
    fn from(value: NativeValue) -> Self {
        FlexInput::Native(value)
    }
}

impl From<NaiveDate> for FlexInput {
    fn from(value: NaiveDate) -> Self {
        FlexInput::Native(NativeValue::Date(value))
    }
}

/// Naive date-times are read as UTC.
impl From<NaiveDateTime> for FlexInput {
    fn from(value: NaiveDateTime) -> Self {
        FlexInput::Native(NativeValue::DateTime(value.and_utc()))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FlexInput {
    fn from(value: DateTime<Tz>) -> Self {
        FlexInput::Native(NativeValue::DateTime(value.with_timezone(&Utc)))
    }
}

impl From<Envelope> for FlexInput {
    fn from(value: Envelope) -> Self {
        FlexInput::Envelope(value)
    }
}

impl From<Components> for FlexInput {
    fn from(value: Components) -> Self {
        FlexInput::Components(value)
    }
}

impl From<&str> for FlexInput {
    fn from(value: &str) -> Self {
        FlexInput::Text(value.to_string())
    }
}

impl From<String> for FlexInput {
    fn from(value: String) -> Self {
        FlexInput::Text(value)
    }
}

impl From<&String> for FlexInput {
    fn from(value: &String) -> Self {
        FlexInput::Text(value.clone())
    }
}

impl TryFrom<&Value> for FlexInput {
    type Error = FlexError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) if map.contains_key("dt") && map.contains_key("mask") => {
                if let Some(key) = map.keys().find(|k| *k != "dt" && *k != "mask") {
                    return Err(FlexError::InvalidComponent(format!("unexpected envelope key '{key}'")));
                }
                let dt = map["dt"]
                    .as_str()
                    .ok_or_else(|| FlexError::InvalidComponent("envelope 'dt' must be a string".to_string()))?;
                let mask = PrecisionMask::try_from(&map["mask"])?;
                Ok(FlexInput::Envelope(Envelope { dt: dt.to_string(), mask }))
            }
            Value::Object(_) => Components::deserialize(value)
                .map(FlexInput::Components)
                .map_err(|e| FlexError::InvalidComponent(e.to_string())),
            Value::String(s) => Ok(FlexInput::Text(s.clone())),
            other => Err(FlexError::InvalidComponent(format!("unsupported input shape: {other}"))),
        }
    }
}

impl TryFrom<Value> for FlexInput {
    type Error = FlexError;

    fn try_from(value: Value) -> Result<Self> {
        FlexInput::try_from(&value)
    }
}

impl FlexTime {
    /// Build from untyped data, sorting it into a [`FlexInput`] shape first.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_value_with(value, &Context::default(), &Options::default())
    }

    pub fn from_value_with(value: &Value, context: &Context, options: &Options) -> Result<Self> {
        FlexTime::with_options(FlexInput::try_from(value)?, context, options)
    }
}

pub(crate) fn construct(input: FlexInput, context: &Context, options: &Options) -> Result<FlexTime> {
    let (instant, mask) = match input {
        FlexInput::Flex(source) => (*source.instant(), source.mask()),
        FlexInput::Envelope(envelope) => {
            let read = engine::read(&envelope.dt, context)?;
            (read.instant, envelope.mask)
        }
        FlexInput::Native(NativeValue::Date(date)) => {
            let instant = date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()).ok_or_else(|| {
                FlexError::InvalidComponent(format!("{date} has no midnight"))
            })?;
            checked(Field::Year, Some(instant.year()), YEAR_RANGE, 0)?;
            (instant, apply_policy(PrecisionMask::up_to(Field::Day), options))
        }
        FlexInput::Native(NativeValue::DateTime(instant)) => {
            checked(Field::Year, Some(instant.year()), YEAR_RANGE, 0)?;
            (instant, apply_policy(PrecisionMask::clear(), options))
        }
        FlexInput::Components(components) => {
            let (instant, mask) = from_components(&components)?;
            (instant, apply_policy(mask, options))
        }
        FlexInput::Text(text) => {
            let read = engine::read(&text, context)?;
            (read.instant, apply_policy(read.mask, options))
        }
    };
    debug!(%instant, %mask, output = %options.output, "constructed");
    Ok(FlexTime::from_parts(instant, mask, options.output))
}

fn apply_policy(mask: PrecisionMask, options: &Options) -> PrecisionMask {
    match options.mask_policy {
        MaskPolicy::Inferred => mask,
        MaskPolicy::Full => PrecisionMask::clear(),
    }
}

fn from_components(components: &Components) -> Result<(DateTime<Utc>, PrecisionMask)> {
    let year = components
        .year
        .ok_or_else(|| FlexError::InvalidComponent("component mapping needs a 'year'".to_string()))?;
    let year = checked(Field::Year, Some(year), YEAR_RANGE, year)?;

    let month = checked(Field::Month, components.month, 1..=12, 1)?;
    let day = checked(Field::Day, components.day, 1..=31, 1)?;
    let hour = checked(Field::Hour, components.hour, 0..=23, 0)?;
    let minute = checked(Field::Minute, components.minute, 0..=59, 0)?;
    let second = checked(Field::Second, components.second, 0..=59, 0)?;
    let millisecond = checked(Field::Millisecond, components.millisecond, 0..=999, 0)?;

    let naive = from_calendar_fields(year, month, day, hour, minute, second, millisecond * 1_000_000)
        .ok_or_else(|| FlexError::InvalidComponent(format!("{components} is not a valid calendar date")))?;

    let present: FieldSet = Field::ALL.into_iter().filter(|f| components.get(*f).is_some()).collect();
    Ok((naive.and_utc(), PrecisionMask::from_present(present)))
}

/// Years every string rendering can carry: four digits, no sign.
const YEAR_RANGE: RangeInclusive<i32> = 0..=9999;

fn checked<T>(field: Field, value: Option<T>, range: RangeInclusive<T>, default: T) -> Result<T>
where
    T: Copy + PartialOrd + fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) if range.contains(&v) => Ok(v),
        Some(v) => Err(FlexError::InvalidComponent(format!(
            "{field} {v} is out of range {}..={}",
            range.start(),
            range.end()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use serde_json::json;

    fn utc(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn value_shapes_dispatch_in_priority_order() {
        let envelope = FlexInput::try_from(json!({"dt": "2023-06-29", "mask": "0001111"})).unwrap();
        assert!(matches!(envelope, FlexInput::Envelope(_)));

        let components = FlexInput::try_from(json!({"year": 2023})).unwrap();
        assert!(matches!(components, FlexInput::Components(_)));

        let text = FlexInput::try_from(json!("2023")).unwrap();
        assert!(matches!(text, FlexInput::Text(_)));

        for bad in [json!(2023), json!(null), json!(true), json!(["2023"])] {
            assert!(matches!(FlexInput::try_from(&bad), Err(FlexError::InvalidComponent(_))), "{bad}");
        }
    }

    #[test]
    fn envelope_with_binary_mask() {
        let ft = FlexTime::from_value(&json!({"dt": "2023-06-29", "mask": "0001111"})).unwrap();
        assert_eq!(*ft.instant(), utc(2023, 6, 29));
        assert_eq!(ft.mask_str(), "0001111");
    }

    #[test]
    fn envelope_with_mapping_mask() {
        let ft = FlexTime::from_value(&json!({
            "dt": "2023-06-29",
            "mask": {
                "year": false, "month": false, "day": false,
                "hour": true, "minute": true, "second": true, "millisecond": true
            }
        }))
        .unwrap();
        assert_eq!(*ft.instant(), utc(2023, 6, 29));
        assert_eq!(ft.mask_str(), "0001111");
    }

    #[test]
    fn envelope_mask_overrides_inferred_mask() {
        let ft = FlexTime::from_value(&json!({"dt": "2023-06-29T10:11:12+00:00", "mask": "0111111"})).unwrap();
        assert_eq!(ft.hour(), 10);
        assert_eq!(ft.mask_str(), "0111111");
    }

    #[test]
    fn envelope_errors() {
        let bad_mask = json!({"dt": "2023-06-29", "mask": "00011"});
        assert!(matches!(FlexTime::from_value(&bad_mask), Err(FlexError::InvalidMask(_))));

        let bad_dt = json!({"dt": "not a date at all", "mask": "0001111"});
        assert!(matches!(FlexTime::from_value(&bad_dt), Err(FlexError::InvalidFormat(_))));

        let extra = json!({"dt": "2023-06-29", "mask": "0001111", "tz": "UTC"});
        assert!(matches!(FlexTime::from_value(&extra), Err(FlexError::InvalidComponent(_))));

        let numeric_dt = json!({"dt": 2023, "mask": "0001111"});
        assert!(matches!(FlexTime::from_value(&numeric_dt), Err(FlexError::InvalidComponent(_))));
    }

    #[test]
    fn components_default_and_mask_absent_fields() {
        let ft = FlexTime::from_value(&json!({"year": 2023, "month": 6, "day": 29})).unwrap();
        assert_eq!(*ft.instant(), utc(2023, 6, 29));
        assert_eq!(ft.mask_str(), "0001111");
        assert_eq!((ft.year(), ft.month(), ft.day()), (2023, 6, 29));

        let ft = FlexTime::from_value(&json!({"year": 2023})).unwrap();
        assert_eq!(*ft.instant(), utc(2023, 1, 1));
        assert_eq!(ft.mask_str(), "0111111");

        // A gap stays masked even though a finer field is given.
        let ft = FlexTime::from_value(&json!({"year": 2023, "day": 5})).unwrap();
        assert_eq!(*ft.instant(), utc(2023, 1, 5));
        assert_eq!(ft.mask_str(), "0101111");

        let ft = FlexTime::new(Components { year: Some(2023), millisecond: Some(250), ..Components::default() })
            .unwrap();
        assert_eq!(ft.millisecond(), 250);
        assert_eq!(ft.mask_str(), "0111110");
    }

    #[test]
    fn components_reject_bad_input() {
        let cases = [
            json!({"year": 2023, "month": 13}),
            json!({"year": 2023, "month": 0}),
            json!({"year": 2023, "month": 2, "day": 30}),
            json!({"year": 2023, "hour": 24}),
            json!({"year": 2023, "millisecond": 1000}),
            json!({"year": 2023, "week": 3}),
            json!({"year": 2023, "month": -1}),
            json!({"year": 10000}),
            json!({"year": -1}),
            json!({"year": "2023"}),
            json!({"month": 6}),
            json!({}),
        ];
        for case in cases {
            assert!(matches!(FlexTime::from_value(&case), Err(FlexError::InvalidComponent(_))), "{case}");
        }
    }

    #[test]
    fn year_bounds_keep_the_envelope_readable() {
        for year in [0, 9999] {
            let ft = FlexTime::from_value(&json!({"year": year})).unwrap();
            let back = FlexTime::from_value(&serde_json::to_value(ft.to_flex()).unwrap()).unwrap();
            assert_eq!(back, ft, "year {year}");
            assert_eq!(back.year(), year);
        }

        let far = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        assert!(matches!(FlexTime::new(far), Err(FlexError::InvalidComponent(_))));
        let before_zero = NaiveDate::from_ymd_opt(-5, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert!(matches!(FlexTime::new(before_zero), Err(FlexError::InvalidComponent(_))));
    }

    #[test]
    fn native_date_masks_clock_fields() {
        let ft = FlexTime::new(NaiveDate::from_ymd_opt(2022, 6, 2).unwrap()).unwrap();
        assert_eq!(*ft.instant(), utc(2022, 6, 2));
        assert_eq!((ft.year(), ft.month(), ft.day()), (2022, 6, 2));
        assert_eq!(ft.mask_str(), "0001111");
    }

    #[test]
    fn native_date_time_is_fully_significant() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let local = offset.with_ymd_and_hms(2023, 6, 29, 15, 0, 0).unwrap();
        let ft = FlexTime::new(local).unwrap();
        assert_eq!(ft.hour(), 14);
        assert_eq!(ft.mask_str(), "0000000");

        let now = Utc::now();
        assert_eq!(*FlexTime::new(now).unwrap().instant(), now);

        let naive = NaiveDate::from_ymd_opt(2023, 6, 29).unwrap().and_hms_opt(8, 0, 0).unwrap();
        assert_eq!(FlexTime::new(naive).unwrap().hour(), 8);
    }

    #[test]
    fn copy_keeps_instant_and_mask() {
        let mut source = FlexTime::new("2023-06-29T14:55").unwrap();
        source.use_only([Field::Year, Field::Month]);
        let copy = FlexTime::new(&source).unwrap();
        assert_eq!(copy.instant(), source.instant());
        assert_eq!(copy.mask(), source.mask());
    }

    #[test]
    fn full_policy_only_touches_inferred_masks() {
        let options = Options { mask_policy: MaskPolicy::Full, ..Options::default() };
        let ctx = Context::default();

        let text = FlexTime::with_options("2023", &ctx, &options).unwrap();
        assert_eq!(text.mask_str(), "0000000");

        let envelope = Envelope { dt: "2023-06-29".to_string(), mask: "0001111".parse().unwrap() };
        let ft = FlexTime::with_options(envelope, &ctx, &options).unwrap();
        assert_eq!(ft.mask_str(), "0001111");
    }
}
