//! Response parsing and schema validation
//!
//! Turns raw model text into typed artifacts or a typed failure. Extraction
//! tolerates surrounding prose, code fences, and trailing punctuation;
//! validation never defaults a missing field.

pub mod extract;
pub mod validate;

pub use extract::extract_json;
pub use validate::{
    parse_alternative_technique, parse_daily_advice, parse_motivation, parse_session_summary,
    parse_weekly_report,
};
