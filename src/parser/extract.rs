//! JSON extraction from noisy model output
//!
//! Models are instructed to answer with bare JSON but regularly wrap it in
//! prose or markdown fences anyway. Extraction scans for balanced objects
//! with string-aware brace matching and returns the first candidate that
//! decodes, so fences, lead-in sentences, and trailing punctuation are all
//! tolerated.

use serde_json::Value;

use crate::errors::{CoachError, Result};

/// Locate and decode the first JSON object embedded in `raw`.
///
/// No decodable object at all is UpstreamError: the provider answered, but
/// not with anything resembling the requested format.
pub fn extract_json(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoachError::UpstreamError(
            "model returned an empty response".to_string(),
        ));
    }

    let bytes = trimmed.as_bytes();
    let mut scan_from = 0;

    while let Some((start, end)) = find_balanced_object(bytes, scan_from) {
        let candidate = &trimmed[start..=end];
        match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => return Ok(value),
            // A balanced-but-invalid span (e.g. prose braces); keep scanning
            _ => scan_from = start + 1,
        }
    }

    Err(CoachError::UpstreamError(format!(
        "no JSON object found in model response ({} chars)",
        trimmed.len()
    )))
}

/// Find the next balanced `{...}` span at or after `from`.
///
/// Single pass with escape and string-boundary tracking, so braces inside
/// string values never unbalance the match.
fn find_balanced_object(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut depth = 0i32;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &byte) in bytes.iter().enumerate().skip(from) {
        if escape_next {
            escape_next = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escape_next = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start {
                        return Some((s, i));
                    }
                }
                if depth < 0 {
                    // Stray closing brace before any object opened
                    depth = 0;
                }
            }
            _ => {}
        }
    }

    None
}
