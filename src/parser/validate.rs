//! Per-artifact schema validation
//!
//! Every required field must be present, correctly shaped, and non-empty;
//! nothing is ever defaulted. On violation the raw payload is logged for
//! diagnosis and the caller receives SchemaViolation, which the API layer
//! surfaces generically.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::error;

use crate::errors::{CoachError, Result};
use crate::parser::extract::extract_json;
use crate::types::{
    AlternativeTechnique, DailyAdvice, Motivation, MotivationTrigger, SessionSummary,
    StatsSnapshot, WeeklyReport,
};

/// How much raw payload to keep in diagnostic logs
const RAW_LOG_LIMIT: usize = 300;

fn log_and_fail(raw: &str, detail: String) -> CoachError {
    let preview: String = raw.chars().take(RAW_LOG_LIMIT).collect();
    error!(raw = %preview, "model payload failed validation: {}", detail);
    CoachError::SchemaViolation(detail)
}

fn as_object<'a>(value: &'a Value, raw: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| log_and_fail(raw, "payload is not a JSON object".to_string()))
}

/// A required string field, non-empty after trimming
fn require_str(obj: &Map<String, Value>, key: &str, raw: &str) -> Result<String> {
    let value = obj
        .get(key)
        .ok_or_else(|| log_and_fail(raw, format!("required field '{}' is missing", key)))?;
    let text = value
        .as_str()
        .ok_or_else(|| log_and_fail(raw, format!("field '{}' is not a string", key)))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(log_and_fail(raw, format!("field '{}' is empty", key)));
    }
    Ok(text.to_string())
}

/// A required non-empty ordered list of non-empty strings
fn require_str_list(obj: &Map<String, Value>, key: &str, raw: &str) -> Result<Vec<String>> {
    let value = obj
        .get(key)
        .ok_or_else(|| log_and_fail(raw, format!("required field '{}' is missing", key)))?;
    let items = value
        .as_array()
        .ok_or_else(|| log_and_fail(raw, format!("field '{}' is not a list", key)))?;
    if items.is_empty() {
        return Err(log_and_fail(raw, format!("field '{}' is an empty list", key)));
    }

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let text = item.as_str().map(str::trim).ok_or_else(|| {
            log_and_fail(raw, format!("field '{}' item {} is not a string", key, i))
        })?;
        if text.is_empty() {
            return Err(log_and_fail(
                raw,
                format!("field '{}' item {} is empty", key, i),
            ));
        }
        out.push(text.to_string());
    }
    Ok(out)
}

pub fn parse_daily_advice(raw: &str, model_used: &str) -> Result<DailyAdvice> {
    let value = extract_json(raw)?;
    let obj = as_object(&value, raw)?;

    Ok(DailyAdvice {
        technique: require_str(obj, "technique", raw)?,
        why_this_works: require_str(obj, "why_this_works", raw)?,
        steps: require_str_list(obj, "steps", raw)?,
        duration_suggestion: require_str(obj, "duration_suggestion", raw)?,
        motivational_note: require_str(obj, "motivational_note", raw)?,
        category_focus: require_str(obj, "category_focus", raw)?,
        generated_at: Utc::now(),
        model_used: model_used.to_string(),
    })
}

pub fn parse_weekly_report(
    raw: &str,
    model_used: &str,
    period_days: u32,
    stats_snapshot: Option<StatsSnapshot>,
) -> Result<WeeklyReport> {
    let value = extract_json(raw)?;
    let obj = as_object(&value, raw)?;

    Ok(WeeklyReport {
        week_summary: require_str(obj, "week_summary", raw)?,
        strengths: require_str_list(obj, "strengths", raw)?,
        improvements: require_str_list(obj, "improvements", raw)?,
        highlight: require_str(obj, "highlight", raw)?,
        next_week_focus: require_str(obj, "next_week_focus", raw)?,
        technique_recommendation: require_str(obj, "technique_recommendation", raw)?,
        technique_reason: require_str(obj, "technique_reason", raw)?,
        motivational_closing: require_str(obj, "motivational_closing", raw)?,
        stats_snapshot,
        period_days,
        generated_at: Utc::now(),
        model_used: model_used.to_string(),
    })
}

pub fn parse_motivation(
    raw: &str,
    model_used: &str,
    expected_trigger: MotivationTrigger,
) -> Result<Motivation> {
    let value = extract_json(raw)?;
    let obj = as_object(&value, raw)?;

    let echoed = require_str(obj, "trigger", raw)?;
    let trigger = MotivationTrigger::from_tag(&echoed)
        .ok_or_else(|| log_and_fail(raw, format!("unknown trigger tag '{}'", echoed)))?;
    if trigger != expected_trigger {
        return Err(log_and_fail(
            raw,
            format!(
                "trigger mismatch: expected '{}', model echoed '{}'",
                expected_trigger.as_str(),
                echoed
            ),
        ));
    }

    Ok(Motivation {
        title: require_str(obj, "title", raw)?,
        message: require_str(obj, "message", raw)?,
        action: require_str(obj, "action", raw)?,
        reminder: require_str(obj, "reminder", raw)?,
        trigger,
        generated_at: Utc::now(),
        model_used: model_used.to_string(),
    })
}

pub fn parse_alternative_technique(
    raw: &str,
    model_used: &str,
    excluded_technique: &str,
) -> Result<AlternativeTechnique> {
    let value = extract_json(raw)?;
    let obj = as_object(&value, raw)?;

    let technique = require_str(obj, "technique", raw)?;
    // The whole point of this artifact is to move away from the rejected
    // technique; re-suggesting it is a contract violation, never accepted
    if technique.eq_ignore_ascii_case(excluded_technique.trim()) {
        return Err(log_and_fail(
            raw,
            format!(
                "model re-suggested the excluded technique '{}'",
                excluded_technique
            ),
        ));
    }

    Ok(AlternativeTechnique {
        technique,
        why_different: require_str(obj, "why_different", raw)?,
        why_suits_you: require_str(obj, "why_suits_you", raw)?,
        steps: require_str_list(obj, "steps", raw)?,
        try_suggestion: require_str(obj, "try_suggestion", raw)?,
        generated_at: Utc::now(),
        model_used: model_used.to_string(),
    })
}

pub fn parse_session_summary(raw: &str, model_used: &str) -> Result<SessionSummary> {
    let value = extract_json(raw)?;
    let obj = as_object(&value, raw)?;

    Ok(SessionSummary {
        reaction: require_str(obj, "reaction", raw)?,
        progress_note: require_str(obj, "progress_note", raw)?,
        next_step: require_str(obj, "next_step", raw)?,
        generated_at: Utc::now(),
        model_used: model_used.to_string(),
    })
}
