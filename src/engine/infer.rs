//! Format inference.
//!
//! ```text
//! &str ──▶ match_structural ──hit──▶ (tag, instant_from_captures, tag.default_mask)
//!               │
//!              miss
//!               ▼
//!         parse_free_form ──ok──▶ (no tag, instant, time-of-day heuristic mask)
//!               │
//!              err ──▶ FlexError::InvalidFormat
//! ```

use super::fallback::parse_free_form;
use super::resolve::instant_from_captures;
use super::table::match_structural;
use crate::error::Result;
use crate::mask::{Field, PrecisionMask};
use crate::{Context, FormatTag};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Outcome of reading a string: the instant, its default mask and, for
/// canonical shapes, the tag that matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inference {
    pub tag: Option<FormatTag>,
    pub instant: DateTime<Utc>,
    pub mask: PrecisionMask,
}

/// Structural tag of `input`, `None` when only the free-form parser accepts it.
pub(crate) fn infer_format(input: &str, context: &Context) -> Result<Option<FormatTag>> {
    let input = input.trim();
    if let Some((tag, _)) = match_structural(input) {
        debug!(input, %tag, "structural match");
        return Ok(Some(tag));
    }
    let (_, stage) = parse_free_form(input, context)?;
    debug!(input, %stage, "accepted by free-form parser");
    Ok(None)
}

/// Read `input` into an instant plus default mask.
pub(crate) fn read(input: &str, context: &Context) -> Result<Inference> {
    let input = input.trim();
    if let Some((tag, caps)) = match_structural(input) {
        debug!(input, %tag, "structural match");
        let instant = instant_from_captures(&caps, input)?;
        return Ok(Inference { tag: Some(tag), instant, mask: tag.default_mask() });
    }

    let (instant, stage) = parse_free_form(input, context)?;
    debug!(input, %stage, %instant, "accepted by free-form parser");
    Ok(Inference { tag: None, instant, mask: free_form_mask(&instant) })
}

/// A free-form result at exactly midnight is read as a bare date.
fn free_form_mask(instant: &DateTime<Utc>) -> PrecisionMask {
    let midnight = [Field::Hour, Field::Minute, Field::Second, Field::Millisecond]
        .into_iter()
        .all(|field| field.extract(instant) == 0);
    if midnight { PrecisionMask::up_to(Field::Day) } else { PrecisionMask::clear() }
}
