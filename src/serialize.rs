//! Persistence.
//!
//! `FlexTime` serializes as the `{dt, mask}` envelope, the only form that
//! survives a round trip with mask and instant intact. Deserialization accepts
//! anything construction accepts: an envelope (binary or mapping mask), a
//! component mapping, or a string.
//!
//! Fields that should be stored as plain strings instead can opt in with
//! `#[serde(with = "flextime::lossy")]`, which writes the `full` string. The
//! instant survives; the mask is whatever the full string's shape implies.

use crate::error::Result;
use crate::FlexTime;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How [`FlexTime::dump`] stores a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpMode {
    /// `{dt, mask}`; round-trips exactly.
    #[default]
    Envelope,
    /// The `full` string only; the mask is dropped.
    Lossy,
}

impl FlexTime {
    pub fn dump(&self, mode: DumpMode) -> Value {
        match mode {
            DumpMode::Envelope => {
                let envelope = self.to_flex();
                serde_json::json!({ "dt": envelope.dt, "mask": envelope.mask.to_binary() })
            }
            DumpMode::Lossy => Value::String(self.to_full()),
        }
    }
}

/// Envelope JSON text.
pub fn to_json(ft: &FlexTime) -> Result<String> {
    Ok(serde_json::to_string(&ft.to_flex())?)
}

/// Read any accepted JSON shape.
pub fn from_json(s: &str) -> Result<FlexTime> {
    let value: Value = serde_json::from_str(s)?;
    FlexTime::from_value(&value)
}

impl Serialize for FlexTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_flex().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FlexTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FlexTime::from_value(&value).map_err(de::Error::custom)
    }
}

/// Store a `FlexTime` field as its full string. Loading accepts any shape.
pub mod lossy {
    use crate::FlexTime;
    use serde::de::{self, Deserializer};
    use serde::ser::Serializer;
    use serde::Deserialize;
    use serde_json::Value;

    pub fn serialize<S: Serializer>(ft: &FlexTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ft.to_full())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FlexTime, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FlexTime::from_value(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, FlexError, OutputFormat};
    use chrono::NaiveDate;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Event {
        name: String,
        at: FlexTime,
        #[serde(with = "crate::lossy")]
        logged: FlexTime,
    }

    fn reload(ft: &FlexTime) -> FlexTime {
        from_json(&to_json(ft).unwrap()).unwrap()
    }

    #[test]
    fn envelope_round_trip_keeps_custom_mask() {
        let mut ft = FlexTime::new("2023-06-29T14:55:30").unwrap();
        ft.use_only([Field::Year, Field::Day]);

        let text = to_json(&ft).unwrap();
        assert_eq!(text, r#"{"dt":"2023-06-29T14:55:30+00:00","mask":"0101111"}"#);

        let back = from_json(&text).unwrap();
        assert_eq!(back.instant(), ft.instant());
        assert_eq!(back.mask(), ft.mask());
    }

    #[test]
    fn now_round_trips_at_any_fraction_width() {
        let ft = FlexTime::now();
        let back = reload(&ft);
        assert_eq!(back, ft);
        assert_eq!(back.instant(), ft.instant());
        assert_eq!(back.mask_str(), "0000000");

        let mut ymd = FlexTime::now();
        ymd.use_only([Field::Year, Field::Month, Field::Day]);
        let back = reload(&ymd);
        assert_eq!(back, ymd);
        assert_eq!(back.mask_str(), "0001111");

        let mut year = FlexTime::now();
        year.use_only([Field::Year]);
        assert_eq!(reload(&year), year);
    }

    #[test]
    fn nanosecond_fraction_reads_back_exactly() {
        let ft = FlexTime::new("2023-06-29T14:55:30.123456789+00:00").unwrap();
        assert_eq!(ft.to_full(), "2023-06-29T14:55:30.123456789+00:00");
        let back = reload(&ft);
        assert_eq!(back.instant(), ft.instant());
        assert_eq!(back.mask(), ft.mask());
    }

    #[test]
    fn free_form_and_native_values_round_trip() {
        for input in ["Aug 28", "Aug 28, 2024", "next friday 8pm", "Thu, 29 Jun 2023 14:55:30 +0000"] {
            let ft = FlexTime::new(input).unwrap();
            let back = reload(&ft);
            assert_eq!(back, ft, "'{input}'");
            assert_eq!(back.mask(), ft.mask(), "'{input}'");
        }

        let ft = FlexTime::new(NaiveDate::from_ymd_opt(2022, 6, 2).unwrap()).unwrap();
        let back = reload(&ft);
        assert_eq!(back, ft);
        assert_eq!((back.year(), back.month(), back.day()), (2022, 6, 2));
        assert_eq!(back.mask_str(), "0001111");
    }

    #[test]
    fn deserialize_accepts_every_shape() {
        let envelope: FlexTime = serde_json::from_value(json!({"dt": "2023-06-29", "mask": "0001111"})).unwrap();
        assert_eq!(envelope.mask_str(), "0001111");

        let mapping: FlexTime = serde_json::from_value(json!({"year": 2023, "month": 6})).unwrap();
        assert_eq!(mapping.mask_str(), "0011111");

        let text: FlexTime = serde_json::from_str(r#""2023-06-29T14:55""#).unwrap();
        assert_eq!(text.mask_str(), "0000011");

        assert!(serde_json::from_value::<FlexTime>(json!(42)).is_err());
    }

    #[test]
    fn struct_fields_round_trip() {
        let event = Event {
            name: "deploy".to_string(),
            at: FlexTime::new("2023-06").unwrap(),
            logged: FlexTime::new("2023-06-29T14:55").unwrap(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "deploy",
                "at": {"dt": "2023-06-01T00:00:00+00:00", "mask": "0011111"},
                "logged": "2023-06-29T14:55:00+00:00"
            })
        );

        let back: Event = serde_json::from_value(value).unwrap();
        assert_eq!(back.name, "deploy");
        assert_eq!(back.at.instant(), event.at.instant());
        assert_eq!(back.at.mask(), event.at.mask());
        // The full string carries seconds, so the minute-precision mask is not restored.
        assert_eq!(back.logged.mask_str(), "0000001");
        assert_eq!(back.logged.instant(), event.logged.instant());
        assert_eq!(back.logged, event.logged);
    }

    #[test]
    fn lossy_field_loads_an_envelope_too() {
        let value = json!({
            "name": "backfill",
            "at": "2023",
            "logged": {"dt": "2023-06-29T14:55:00+00:00", "mask": "0011111"}
        });
        let event: Event = serde_json::from_value(value).unwrap();
        assert_eq!(event.at.mask_str(), "0111111");
        assert_eq!(event.logged.mask_str(), "0011111");
        assert_eq!(serde_json::to_value(&event).unwrap()["logged"], json!("2023-06-29T14:55:00+00:00"));
    }

    #[test]
    fn lossy_dump_is_the_full_string() {
        let mut ft = FlexTime::new("2023-06-29").unwrap();
        assert_eq!(ft.dump(DumpMode::Envelope), json!({"dt": "2023-06-29T00:00:00+00:00", "mask": "0001111"}));
        assert_eq!(ft.dump(DumpMode::Lossy), json!("2023-06-29T00:00:00+00:00"));

        // The stored output strategy does not change either mode.
        ft.set_output(OutputFormat::Components);
        assert_eq!(ft.dump(DumpMode::Lossy), json!("2023-06-29T00:00:00+00:00"));
        assert_eq!(ft.dump(DumpMode::Envelope)["mask"], json!("0001111"));

        let reloaded = FlexTime::from_value(&ft.dump(DumpMode::Lossy)).unwrap();
        assert_eq!(reloaded.instant(), ft.instant());
        assert_eq!(reloaded.mask_str(), "0000001");
    }

    #[test]
    fn bad_json_is_reported() {
        assert!(matches!(from_json("{"), Err(FlexError::InvalidComponent(_))));
        assert!(matches!(from_json(r#"{"dt": "2023", "mask": "2"}"#), Err(FlexError::InvalidMask(_))));
    }
}
