//! Feedback recorder
//!
//! Persists like/dislike verdicts and, on a dislike, asks the orchestrator
//! for a replacement technique. The replacement path is best-effort:
//! feedback that reached the store is recorded successfully even when no
//! alternative could be generated.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::coach::orchestrator::CoachOrchestrator;
use crate::context::FeedbackStore;
use crate::errors::{CoachError, Result};
use crate::types::{AdviceType, AlternativeTechnique, FeedbackRecord};

/// Outcome returned to the client after recording feedback
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackOutcome {
    pub success: bool,
    pub message: String,
    pub feedback_id: Uuid,

    /// Present only when a dislike produced a replacement suggestion
    pub alternative: Option<AlternativeTechnique>,
}

pub struct FeedbackRecorder {
    store: Arc<dyn FeedbackStore>,
    orchestrator: Arc<CoachOrchestrator>,
}

impl FeedbackRecorder {
    pub fn new(store: Arc<dyn FeedbackStore>, orchestrator: Arc<CoachOrchestrator>) -> Self {
        Self {
            store,
            orchestrator,
        }
    }

    pub async fn record(
        &self,
        user_id: i64,
        technique: &str,
        liked: bool,
        rejection_reason: Option<&str>,
        advice_type: AdviceType,
    ) -> Result<FeedbackOutcome> {
        let technique = technique.trim();
        if technique.len() < 2 {
            return Err(CoachError::InvalidRequest(
                "technique name must be at least 2 characters".to_string(),
            ));
        }

        let record = FeedbackRecord::new(
            user_id,
            technique.to_string(),
            liked,
            rejection_reason.map(str::to_string),
            advice_type,
        );
        self.store.save(&record).await?;
        info!(user_id, technique, liked, feedback_id = %record.id, "feedback recorded");

        if liked {
            return Ok(FeedbackOutcome {
                success: true,
                message: format!("'{}' was added to your liked techniques.", technique),
                feedback_id: record.id,
                alternative: None,
            });
        }

        // Dislike: try to synthesise a replacement. Failure here never
        // fails the recording itself.
        let alternative = match self
            .orchestrator
            .alternative_technique(user_id, technique, rejection_reason)
            .await
        {
            Ok(alternative) => Some(alternative),
            Err(e) => {
                warn!(
                    user_id,
                    technique,
                    kind = e.machine_tag(),
                    "alternative generation failed; feedback kept"
                );
                None
            }
        };

        Ok(FeedbackOutcome {
            success: true,
            message: format!(
                "Feedback recorded. '{}' won't be suggested again.",
                technique
            ),
            feedback_id: record.id,
            alternative,
        })
    }
}
