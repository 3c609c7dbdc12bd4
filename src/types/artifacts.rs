//! Typed coaching artifacts
//!
//! One concrete struct per artifact plus a tagged union for callers that
//! handle them uniformly. Artifacts are ephemeral: constructed per request,
//! returned to the client, never persisted here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::stats::StatsSnapshot;
use crate::types::trigger::MotivationTrigger;

/// Discriminant for the five artifact types.
///
/// The prompt builder uses it to render the output-schema block and the
/// parser uses it to select validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    DailyAdvice,
    WeeklyReport,
    Motivation,
    AlternativeTechnique,
    SessionSummary,
}

impl ArtifactKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ArtifactKind::DailyAdvice => "daily advice",
            ArtifactKind::WeeklyReport => "weekly report",
            ArtifactKind::Motivation => "motivation message",
            ArtifactKind::AlternativeTechnique => "alternative technique",
            ArtifactKind::SessionSummary => "session summary",
        }
    }
}

/// Daily study-technique recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAdvice {
    /// Recommended technique name, e.g. "Pomodoro 25/5"
    pub technique: String,
    pub why_this_works: String,
    /// Concrete application steps, at least one
    pub steps: Vec<String>,
    pub duration_suggestion: String,
    pub motivational_note: String,
    pub category_focus: String,
    pub generated_at: DateTime<Utc>,
    pub model_used: String,
}

/// Coaching report over a trailing window of days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub week_summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub highlight: String,
    pub next_week_focus: String,
    pub technique_recommendation: String,
    pub technique_reason: String,
    pub motivational_closing: String,

    /// The statistics the report was generated from; None when the window
    /// held no data (the report text then describes the absence)
    pub stats_snapshot: Option<StatsSnapshot>,
    pub period_days: u32,

    pub generated_at: DateTime<Utc>,
    pub model_used: String,
}

/// Short motivational push tied to a trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motivation {
    pub title: String,
    pub message: String,
    /// One small concrete step to take right now
    pub action: String,
    pub reminder: String,
    /// Echoes the requested trigger
    pub trigger: MotivationTrigger,
    pub generated_at: DateTime<Utc>,
    pub model_used: String,
}

/// Replacement suggestion after a technique was rejected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeTechnique {
    /// Never case-insensitively equal to the rejected technique
    pub technique: String,
    pub why_different: String,
    pub why_suits_you: String,
    pub steps: Vec<String>,
    pub try_suggestion: String,
    pub generated_at: DateTime<Utc>,
    pub model_used: String,
}

/// Instant reaction to a just-completed session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reaction: String,
    pub progress_note: String,
    pub next_step: String,
    pub generated_at: DateTime<Utc>,
    pub model_used: String,
}

/// Tagged union over the five artifact types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdviceArtifact {
    DailyAdvice(DailyAdvice),
    WeeklyReport(WeeklyReport),
    Motivation(Motivation),
    AlternativeTechnique(AlternativeTechnique),
    SessionSummary(SessionSummary),
}

impl AdviceArtifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            AdviceArtifact::DailyAdvice(_) => ArtifactKind::DailyAdvice,
            AdviceArtifact::WeeklyReport(_) => ArtifactKind::WeeklyReport,
            AdviceArtifact::Motivation(_) => ArtifactKind::Motivation,
            AdviceArtifact::AlternativeTechnique(_) => ArtifactKind::AlternativeTechnique,
            AdviceArtifact::SessionSummary(_) => ArtifactKind::SessionSummary,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        match self {
            AdviceArtifact::DailyAdvice(a) => a.generated_at,
            AdviceArtifact::WeeklyReport(a) => a.generated_at,
            AdviceArtifact::Motivation(a) => a.generated_at,
            AdviceArtifact::AlternativeTechnique(a) => a.generated_at,
            AdviceArtifact::SessionSummary(a) => a.generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_union_tags_kind() {
        let advice = DailyAdvice {
            technique: "Pomodoro 25/5".to_string(),
            why_this_works: "Short cycles fit your schedule.".to_string(),
            steps: vec!["Set a 25 minute timer".to_string()],
            duration_suggestion: "25 on, 5 off".to_string(),
            motivational_note: "Strong start today.".to_string(),
            category_focus: "reading".to_string(),
            generated_at: Utc::now(),
            model_used: "qwen2.5:7b-instruct".to_string(),
        };
        let artifact = AdviceArtifact::DailyAdvice(advice);
        assert_eq!(artifact.kind(), ArtifactKind::DailyAdvice);

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["kind"], "daily_advice");
        assert_eq!(json["technique"], "Pomodoro 25/5");
    }

    #[test]
    fn test_kind_serde_tags() {
        let json = serde_json::to_string(&ArtifactKind::AlternativeTechnique).unwrap();
        assert_eq!(json, "\"alternative_technique\"");
    }
}
