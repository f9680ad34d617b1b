//! Format inference engine.
//!
//! Reading a string is a two-tier pipeline:
//!
//! ```text
//! input ──▶ PATTERN_TABLE (table.rs)   ordered, anchored, strict matchers
//!              │ hit                       └─ one row per FormatTag
//!              ▼
//!           instant_from_captures (resolve.rs)
//!              │ miss
//!              ▼
//!           parse_free_form (fallback.rs)   chrono / chrono-english
//!              ▼
//!           Inference (infer.rs)            instant + default mask [+ tag]
//! ```
//!
//! The table is data: adding a canonical shape means adding a `FormatTag`
//! variant and one `format_rule!` row, nothing else.
//!
//! ## Debugging
//!
//! Matches and fallback decisions are reported as `tracing` debug events.

#[path = "engine/fallback.rs"]
mod fallback;
#[path = "engine/infer.rs"]
mod infer;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/table.rs"]
mod table;


pub use fallback::FallbackStage;
pub use infer::Inference;
pub(crate) use infer::{infer_format, read};
pub(crate) use resolve::from_calendar_fields;
pub use table::FormatRule;
