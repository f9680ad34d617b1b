//! The structural pattern table.
//!
//! One anchored regex per canonical [`FormatTag`], tried top to bottom from
//! most to least specific. Matchers are strict: fixed-width ASCII digit groups
//! and literal separators only. Named groups (`year`, `month`, `day`, `hour`,
//! `minute`, `second`, `fraction`, `offset`) feed `resolve.rs`.
//!
//! ## Invariants
//!
//! - Every `FormatTag::ALL` entry has exactly one row, in the same order.
//! - Rows are disjoint: no string matches two rows (widths and separator
//!   placement differ), so "first match wins" never hides a tie.
//! - There is no compact `YYYYMM` row.

use crate::FormatTag;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A table row.
#[derive(Debug)]
pub struct FormatRule {
    pub tag: FormatTag,
    pub matcher: &'static Regex,
}

pub(crate) static PATTERN_TABLE: Lazy<Vec<FormatRule>> = Lazy::new(rules);

fn rules() -> Vec<FormatRule> {
    vec![
        // --- Dashed family ------------------------------------------------------
        format_rule!(
            DashedMicrosOffset,
            r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})\.(?P<fraction>[0-9]{6})(?P<offset>Z|[+-][0-9]{2}:[0-9]{2})$"
        ),
        format_rule!(
            DashedMillisOffset,
            r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})\.(?P<fraction>[0-9]{3})(?P<offset>Z|[+-][0-9]{2}:[0-9]{2})$"
        ),
        format_rule!(
            DashedSecondsOffset,
            r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})(?P<offset>Z|[+-][0-9]{2}:[0-9]{2})$"
        ),
        format_rule!(
            DashedMicros,
            r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})\.(?P<fraction>[0-9]{6})$"
        ),
        format_rule!(
            DashedMillis,
            r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})\.(?P<fraction>[0-9]{3})$"
        ),
        format_rule!(
            DashedSeconds,
            r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})$"
        ),
        format_rule!(
            DashedMinutes,
            r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2})$"
        ),
        format_rule!(DashedHours, r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2})$"),
        format_rule!(DashedDate, r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})$"),
        format_rule!(DashedMonth, r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})$"),
        // --- Compact family -----------------------------------------------------
        format_rule!(
            CompactMicrosOffset,
            r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})T(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})(?P<second>[0-9]{2})\.(?P<fraction>[0-9]{6})(?P<offset>Z|[+-][0-9]{2}:[0-9]{2})$"
        ),
        format_rule!(
            CompactMillisOffset,
            r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})T(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})(?P<second>[0-9]{2})\.(?P<fraction>[0-9]{3})(?P<offset>Z|[+-][0-9]{2}:[0-9]{2})$"
        ),
        format_rule!(
            CompactSecondsOffset,
            r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})T(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})(?P<second>[0-9]{2})(?P<offset>Z|[+-][0-9]{2}:[0-9]{2})$"
        ),
        format_rule!(
            CompactMicros,
            r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})T(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})(?P<second>[0-9]{2})\.(?P<fraction>[0-9]{6})$"
        ),
        format_rule!(
            CompactMillis,
            r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})T(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})(?P<second>[0-9]{2})\.(?P<fraction>[0-9]{3})$"
        ),
        format_rule!(
            CompactSeconds,
            r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})T(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})(?P<second>[0-9]{2})$"
        ),
        format_rule!(
            CompactMinutes,
            r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})T(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})$"
        ),
        format_rule!(CompactHours, r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})T(?P<hour>[0-9]{2})$"),
        format_rule!(CompactDate, r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})$"),
        // --- Year ---------------------------------------------------------------
        format_rule!(Year, r"^(?P<year>[0-9]{4})$"),
    ]
}

/// First row whose matcher accepts `input`, with its captures.
pub(crate) fn match_structural(input: &str) -> Option<(FormatTag, Captures<'_>)> {
    PATTERN_TABLE.iter().find_map(|rule| rule.matcher.captures(input).map(|caps| (rule.tag, caps)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_follow_tag_order() {
        let tags: Vec<FormatTag> = PATTERN_TABLE.iter().map(|r| r.tag).collect();
        assert_eq!(tags, FormatTag::ALL.to_vec());
    }

    #[test]
    fn rows_are_disjoint_on_rendered_examples() {
        let instant = chrono::DateTime::parse_from_rfc3339("2023-06-29T14:55:30.123456+00:00")
            .unwrap()
            .with_timezone(&chrono::Utc);

        for tag in FormatTag::ALL {
            let sample = tag.render(&instant);
            let hits: Vec<FormatTag> =
                PATTERN_TABLE.iter().filter(|r| r.matcher.is_match(&sample)).map(|r| r.tag).collect();
            assert_eq!(hits, vec![tag], "sample '{}' matched {:?}", sample, hits);
        }
    }

    #[test]
    fn matchers_reject_non_ascii_digits() {
        assert!(match_structural("٢٠٢٣").is_none());
    }
}
