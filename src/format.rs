//! Canonical format tags.
//!
//! A [`FormatTag`] names one member of the fixed family of string shapes that
//! the structural table recognizes. Each tag knows the finest field it carries
//! (its *precision*) and how to render an instant in its own shape.

use crate::error::{FlexError, Result};
use crate::mask::{Field, PrecisionMask};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// `YYYY-MM-DDTHH:mm:ssSSSSSSZZ`
    DashedMicrosOffset,
    /// `YYYY-MM-DDTHH:mm:ssSSSZZ`
    DashedMillisOffset,
    /// `YYYY-MM-DDTHH:mm:ssZZ`
    DashedSecondsOffset,
    /// `YYYY-MM-DDTHH:mm:ssSSSSSS`
    DashedMicros,
    /// `YYYY-MM-DDTHH:mm:ssSSS`
    DashedMillis,
    /// `YYYY-MM-DDTHH:mm:ss`
    DashedSeconds,
    /// `YYYY-MM-DDTHH:mm`
    DashedMinutes,
    /// `YYYY-MM-DDTHH`
    DashedHours,
    /// `YYYY-MM-DD`
    DashedDate,
    /// `YYYY-MM`
    DashedMonth,
    /// `YYYYMMDDTHHmmssSSSSSSZZ`
    CompactMicrosOffset,
    /// `YYYYMMDDTHHmmssSSSZZ`
    CompactMillisOffset,
    /// `YYYYMMDDTHHmmssZZ`
    CompactSecondsOffset,
    /// `YYYYMMDDTHHmmssSSSSSS`
    CompactMicros,
    /// `YYYYMMDDTHHmmssSSS`
    CompactMillis,
    /// `YYYYMMDDTHHmmss`
    CompactSeconds,
    /// `YYYYMMDDTHHmm`
    CompactMinutes,
    /// `YYYYMMDDTHH`
    CompactHours,
    /// `YYYYMMDD`
    CompactDate,
    /// `YYYY`
    Year,
}

impl FormatTag {
    /// Every tag, most specific first (the order of the structural table).
    pub const ALL: [FormatTag; 20] = [
        FormatTag::DashedMicrosOffset,
        FormatTag::DashedMillisOffset,
        FormatTag::DashedSecondsOffset,
        FormatTag::DashedMicros,
        FormatTag::DashedMillis,
        FormatTag::DashedSeconds,
        FormatTag::DashedMinutes,
        FormatTag::DashedHours,
        FormatTag::DashedDate,
        FormatTag::DashedMonth,
        FormatTag::CompactMicrosOffset,
        FormatTag::CompactMillisOffset,
        FormatTag::CompactSecondsOffset,
        FormatTag::CompactMicros,
        FormatTag::CompactMillis,
        FormatTag::CompactSeconds,
        FormatTag::CompactMinutes,
        FormatTag::CompactHours,
        FormatTag::CompactDate,
        FormatTag::Year,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormatTag::DashedMicrosOffset => "YYYY-MM-DDTHH:mm:ssSSSSSSZZ",
            FormatTag::DashedMillisOffset => "YYYY-MM-DDTHH:mm:ssSSSZZ",
            FormatTag::DashedSecondsOffset => "YYYY-MM-DDTHH:mm:ssZZ",
            FormatTag::DashedMicros => "YYYY-MM-DDTHH:mm:ssSSSSSS",
            FormatTag::DashedMillis => "YYYY-MM-DDTHH:mm:ssSSS",
            FormatTag::DashedSeconds => "YYYY-MM-DDTHH:mm:ss",
            FormatTag::DashedMinutes => "YYYY-MM-DDTHH:mm",
            FormatTag::DashedHours => "YYYY-MM-DDTHH",
            FormatTag::DashedDate => "YYYY-MM-DD",
            FormatTag::DashedMonth => "YYYY-MM",
            FormatTag::CompactMicrosOffset => "YYYYMMDDTHHmmssSSSSSSZZ",
            FormatTag::CompactMillisOffset => "YYYYMMDDTHHmmssSSSZZ",
            FormatTag::CompactSecondsOffset => "YYYYMMDDTHHmmssZZ",
            FormatTag::CompactMicros => "YYYYMMDDTHHmmssSSSSSS",
            FormatTag::CompactMillis => "YYYYMMDDTHHmmssSSS",
            FormatTag::CompactSeconds => "YYYYMMDDTHHmmss",
            FormatTag::CompactMinutes => "YYYYMMDDTHHmm",
            FormatTag::CompactHours => "YYYYMMDDTHH",
            FormatTag::CompactDate => "YYYYMMDD",
            FormatTag::Year => "YYYY",
        }
    }

    /// Finest field the shape carries.
    pub fn precision(self) -> Field {
        use FormatTag::*;
        match self {
            DashedMicrosOffset | DashedMillisOffset | DashedMicros | DashedMillis => Field::Millisecond,
            CompactMicrosOffset | CompactMillisOffset | CompactMicros | CompactMillis => Field::Millisecond,
            DashedSecondsOffset | DashedSeconds | CompactSecondsOffset | CompactSeconds => Field::Second,
            DashedMinutes | CompactMinutes => Field::Minute,
            DashedHours | CompactHours => Field::Hour,
            DashedDate | CompactDate => Field::Day,
            DashedMonth => Field::Month,
            Year => Field::Year,
        }
    }

    /// Whether the shape ends in a `Z` / `±HH:MM` marker.
    pub fn has_offset(self) -> bool {
        matches!(
            self,
            FormatTag::DashedMicrosOffset
                | FormatTag::DashedMillisOffset
                | FormatTag::DashedSecondsOffset
                | FormatTag::CompactMicrosOffset
                | FormatTag::CompactMillisOffset
                | FormatTag::CompactSecondsOffset
        )
    }

    /// Default mask for a value read from this shape: given fields are
    /// significant, finer ones are masked out.
    pub fn default_mask(self) -> PrecisionMask {
        PrecisionMask::up_to(self.precision())
    }

    /// Shortest dashed, offset-free tag carrying `precision`.
    pub fn minimal_for(precision: Field) -> FormatTag {
        match precision {
            Field::Year => FormatTag::Year,
            Field::Month => FormatTag::DashedMonth,
            Field::Day => FormatTag::DashedDate,
            Field::Hour => FormatTag::DashedHours,
            Field::Minute => FormatTag::DashedMinutes,
            Field::Second => FormatTag::DashedSeconds,
            Field::Millisecond => FormatTag::DashedMillis,
        }
    }

    fn strftime(self) -> &'static str {
        match self {
            FormatTag::DashedMicrosOffset => "%Y-%m-%dT%H:%M:%S%.6f%:z",
            FormatTag::DashedMillisOffset => "%Y-%m-%dT%H:%M:%S%.3f%:z",
            FormatTag::DashedSecondsOffset => "%Y-%m-%dT%H:%M:%S%:z",
            FormatTag::DashedMicros => "%Y-%m-%dT%H:%M:%S%.6f",
            FormatTag::DashedMillis => "%Y-%m-%dT%H:%M:%S%.3f",
            FormatTag::DashedSeconds => "%Y-%m-%dT%H:%M:%S",
            FormatTag::DashedMinutes => "%Y-%m-%dT%H:%M",
            FormatTag::DashedHours => "%Y-%m-%dT%H",
            FormatTag::DashedDate => "%Y-%m-%d",
            FormatTag::DashedMonth => "%Y-%m",
            FormatTag::CompactMicrosOffset => "%Y%m%dT%H%M%S%.6f%:z",
            FormatTag::CompactMillisOffset => "%Y%m%dT%H%M%S%.3f%:z",
            FormatTag::CompactSecondsOffset => "%Y%m%dT%H%M%S%:z",
            FormatTag::CompactMicros => "%Y%m%dT%H%M%S%.6f",
            FormatTag::CompactMillis => "%Y%m%dT%H%M%S%.3f",
            FormatTag::CompactSeconds => "%Y%m%dT%H%M%S",
            FormatTag::CompactMinutes => "%Y%m%dT%H%M",
            FormatTag::CompactHours => "%Y%m%dT%H",
            FormatTag::CompactDate => "%Y%m%d",
            FormatTag::Year => "%Y",
        }
    }

    /// Render `instant` in this shape. Offsets render as `+00:00`.
    pub fn render(self, instant: &DateTime<Utc>) -> String {
        instant.fixed_offset().format(self.strftime()).to_string()
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = FlexError;

    fn from_str(s: &str) -> Result<Self> {
        FormatTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| FlexError::InvalidFormat(format!("unknown format tag '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn tag_strings_are_unique_and_parse_back() {
        for tag in FormatTag::ALL {
            assert_eq!(tag.as_str().parse::<FormatTag>().unwrap(), tag);
        }
        assert!(matches!("YYYYMM".parse::<FormatTag>(), Err(FlexError::InvalidFormat(_))));
    }

    #[test]
    fn default_masks_follow_precision() {
        assert_eq!(FormatTag::Year.default_mask().to_binary(), "0111111");
        assert_eq!(FormatTag::DashedMonth.default_mask().to_binary(), "0011111");
        assert_eq!(FormatTag::CompactDate.default_mask().to_binary(), "0001111");
        assert_eq!(FormatTag::DashedHours.default_mask().to_binary(), "0000111");
        assert_eq!(FormatTag::CompactMinutes.default_mask().to_binary(), "0000011");
        assert_eq!(FormatTag::DashedSecondsOffset.default_mask().to_binary(), "0000001");
        assert_eq!(FormatTag::DashedMicrosOffset.default_mask().to_binary(), "0000000");
    }

    #[test]
    fn render_matches_shape() {
        let instant = Utc.with_ymd_and_hms(2023, 6, 29, 14, 55, 30).unwrap()
            + chrono::Duration::microseconds(123_456);

        assert_eq!(FormatTag::Year.render(&instant), "2023");
        assert_eq!(FormatTag::DashedMonth.render(&instant), "2023-06");
        assert_eq!(FormatTag::CompactDate.render(&instant), "20230629");
        assert_eq!(FormatTag::DashedMillis.render(&instant), "2023-06-29T14:55:30.123");
        assert_eq!(FormatTag::CompactMinutes.render(&instant), "20230629T1455");
        assert_eq!(FormatTag::DashedMicrosOffset.render(&instant), "2023-06-29T14:55:30.123456+00:00");
        assert_eq!(FormatTag::CompactSecondsOffset.render(&instant), "20230629T145530+00:00");
    }

    #[test]
    fn minimal_tags_carry_requested_precision() {
        for field in Field::ALL {
            let tag = FormatTag::minimal_for(field);
            assert_eq!(tag.precision(), field);
            assert!(!tag.has_offset());
        }
    }
}
