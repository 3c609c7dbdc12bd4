//! Coaching orchestrator
//!
//! The façade sequencing Assemble → Prompt → Generate → Parse for each
//! artifact type. Stateless across calls: concurrent requests for the same
//! user never synchronise, and nothing produced here is persisted.

use std::sync::Arc;

use tracing::{info, warn};

use crate::coach::phase::{PhaseTracker, RequestPhase};
use crate::context::{ContextAssembler, DEFAULT_WINDOW_DAYS};
use crate::errors::{CoachError, Result};
use crate::gateway::{HealthReport, ModelTier, TextGenerator};
use crate::parser;
use crate::prompt;
use crate::types::{
    AlternativeTechnique, DailyAdvice, Motivation, MotivationTrigger, SessionRecord,
    SessionStatus, SessionSummary, WeeklyReport,
};

/// Fold a stage failure into the tracker before propagating
fn track<T>(tracker: &mut PhaseTracker, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracker.fail(e);
    }
    result
}

pub struct CoachOrchestrator {
    assembler: ContextAssembler,
    gateway: Arc<dyn TextGenerator>,
}

impl CoachOrchestrator {
    pub fn new(assembler: ContextAssembler, gateway: Arc<dyn TextGenerator>) -> Self {
        Self { assembler, gateway }
    }

    /// Daily study-technique advice from today's data
    pub async fn daily_advice(
        &self,
        user_id: i64,
        extra_context: Option<&str>,
    ) -> Result<DailyAdvice> {
        let mut tracker = PhaseTracker::new("daily_advice");
        info!(user_id, request_id = %tracker.request_id(), "daily advice requested");

        tracker.enter(RequestPhase::Assembling);
        let user = track(&mut tracker, self.assembler.user_context(user_id).await)?;
        let today = track(&mut tracker, self.assembler.today_stats(user_id).await)?;
        let feedback = track(&mut tracker, self.assembler.feedback_history(user_id).await)?;

        tracker.enter(RequestPhase::Prompting);
        let prompt = prompt::daily_advice(&user, &today, &feedback, extra_context);

        tracker.enter(RequestPhase::AwaitingModel);
        let raw = track(
            &mut tracker,
            self.gateway.generate(&prompt.text, ModelTier::Fast).await,
        )?;

        tracker.enter(RequestPhase::Parsing);
        let advice = track(
            &mut tracker,
            parser::parse_daily_advice(&raw, self.gateway.model_tag(ModelTier::Fast)),
        )?;

        tracker.succeed();
        info!(user_id, technique = %advice.technique, "daily advice generated");
        Ok(advice)
    }

    /// Coaching report over the trailing window; `days` defaults to 7.
    ///
    /// The window is validated before any provider or gateway work, so an
    /// out-of-range request costs nothing upstream. An empty window still
    /// produces a report, with a null snapshot.
    pub async fn weekly_report(&self, user_id: i64, days: Option<u32>) -> Result<WeeklyReport> {
        let mut tracker = PhaseTracker::new("weekly_report");
        let days = track(
            &mut tracker,
            ContextAssembler::validate_window(days.unwrap_or(DEFAULT_WINDOW_DAYS)),
        )?;
        info!(user_id, days, request_id = %tracker.request_id(), "weekly report requested");

        tracker.enter(RequestPhase::Assembling);
        let user = track(&mut tracker, self.assembler.user_context(user_id).await)?;
        let snapshot = track(
            &mut tracker,
            self.assembler.window_snapshot(user_id, days).await,
        )?;
        let feedback = track(&mut tracker, self.assembler.feedback_history(user_id).await)?;

        tracker.enter(RequestPhase::Prompting);
        let prompt = prompt::weekly_report(&user, snapshot.as_ref(), &feedback, days);

        tracker.enter(RequestPhase::AwaitingModel);
        let raw = track(
            &mut tracker,
            self.gateway.generate(&prompt.text, ModelTier::Heavy).await,
        )?;

        tracker.enter(RequestPhase::Parsing);
        let report = track(
            &mut tracker,
            parser::parse_weekly_report(
                &raw,
                self.gateway.model_tag(ModelTier::Heavy),
                days,
                snapshot,
            ),
        )?;

        tracker.succeed();
        info!(user_id, days, "weekly report generated");
        Ok(report)
    }

    /// Motivation message for the given trigger
    pub async fn motivation(
        &self,
        user_id: i64,
        trigger: MotivationTrigger,
        user_note: Option<&str>,
    ) -> Result<Motivation> {
        let mut tracker = PhaseTracker::new("motivation");
        info!(
            user_id,
            trigger = trigger.as_str(),
            request_id = %tracker.request_id(),
            "motivation requested"
        );

        tracker.enter(RequestPhase::Assembling);
        let user = track(&mut tracker, self.assembler.user_context(user_id).await)?;
        let today = track(&mut tracker, self.assembler.today_stats(user_id).await)?;

        tracker.enter(RequestPhase::Prompting);
        let prompt = prompt::motivation(&user, &today, trigger, user_note);

        tracker.enter(RequestPhase::AwaitingModel);
        let raw = track(
            &mut tracker,
            self.gateway.generate(&prompt.text, ModelTier::Fast).await,
        )?;

        tracker.enter(RequestPhase::Parsing);
        let motivation = track(
            &mut tracker,
            parser::parse_motivation(&raw, self.gateway.model_tag(ModelTier::Fast), trigger),
        )?;

        tracker.succeed();
        Ok(motivation)
    }

    /// Replacement suggestion after a rejected technique
    pub async fn alternative_technique(
        &self,
        user_id: i64,
        rejected_technique: &str,
        rejection_reason: Option<&str>,
    ) -> Result<AlternativeTechnique> {
        let mut tracker = PhaseTracker::new("alternative_technique");
        let rejected = rejected_technique.trim();
        if rejected.is_empty() {
            let err = CoachError::InvalidRequest(
                "rejected technique name must not be empty".to_string(),
            );
            tracker.fail(&err);
            return Err(err);
        }
        info!(user_id, rejected, request_id = %tracker.request_id(), "alternative requested");

        tracker.enter(RequestPhase::Assembling);
        let user = track(&mut tracker, self.assembler.user_context(user_id).await)?;
        let feedback = track(&mut tracker, self.assembler.feedback_history(user_id).await)?;

        tracker.enter(RequestPhase::Prompting);
        let prompt = prompt::alternative_technique(&user, rejected, rejection_reason, &feedback);

        tracker.enter(RequestPhase::AwaitingModel);
        let raw = track(
            &mut tracker,
            self.gateway.generate(&prompt.text, ModelTier::Fast).await,
        )?;

        tracker.enter(RequestPhase::Parsing);
        let alternative = track(
            &mut tracker,
            parser::parse_alternative_technique(
                &raw,
                self.gateway.model_tag(ModelTier::Fast),
                rejected,
            ),
        )?;

        tracker.succeed();
        info!(user_id, technique = %alternative.technique, "alternative generated");
        Ok(alternative)
    }

    /// Instant feedback for a just-completed session
    pub async fn session_summary(&self, user_id: i64, session_id: i64) -> Result<SessionSummary> {
        let mut tracker = PhaseTracker::new("session_summary");
        info!(user_id, session_id, request_id = %tracker.request_id(), "session summary requested");

        tracker.enter(RequestPhase::Assembling);
        let user = track(&mut tracker, self.assembler.user_context(user_id).await)?;
        let session = track(&mut tracker, self.assembler.session(user_id, session_id).await)?;
        let session = track(&mut tracker, Self::require_completed(session))?;
        let today = track(&mut tracker, self.assembler.today_stats(user_id).await)?;

        tracker.enter(RequestPhase::Prompting);
        let prompt = prompt::session_summary(&user, &session, &today);

        tracker.enter(RequestPhase::AwaitingModel);
        let raw = track(
            &mut tracker,
            self.gateway.generate(&prompt.text, ModelTier::Fast).await,
        )?;

        tracker.enter(RequestPhase::Parsing);
        let summary = track(
            &mut tracker,
            parser::parse_session_summary(&raw, self.gateway.model_tag(ModelTier::Fast)),
        )?;

        tracker.succeed();
        Ok(summary)
    }

    fn require_completed(session: SessionRecord) -> Result<SessionRecord> {
        if session.status != SessionStatus::Completed {
            warn!(session_id = session.id, "summary requested for unfinished session");
            return Err(CoachError::InvalidRequest(
                "session is not completed yet; finish it first".to_string(),
            ));
        }
        Ok(session)
    }

    /// Probe the model endpoint for the health route
    pub async fn health(&self) -> HealthReport {
        self.gateway.health().await
    }
}
