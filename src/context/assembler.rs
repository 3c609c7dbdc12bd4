//! Context assembler
//!
//! Gathers (UserContext, StatsSnapshot) for a request and aggregates raw
//! session rows into the statistics the prompts are built from. Pure read:
//! no side effects, nothing cached across requests.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use crate::context::providers::{FeedbackStore, ProfileProvider, StatsProvider};
use crate::errors::{CoachError, Result};
use crate::types::{
    CategoryStats, DailyStats, FeedbackHistory, SessionRecord, SessionStatus, StatsSnapshot,
    UserContext,
};

/// Smallest accepted statistics window
pub const MIN_WINDOW_DAYS: u32 = 3;

/// Largest accepted statistics window
pub const MAX_WINDOW_DAYS: u32 = 30;

/// Window used when the caller does not specify one
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// How many recent feedback records feed the prompt context
const FEEDBACK_HISTORY_LIMIT: usize = 20;

/// Per-request data gatherer over the collaborator traits
#[derive(Clone)]
pub struct ContextAssembler {
    profiles: Arc<dyn ProfileProvider>,
    stats: Arc<dyn StatsProvider>,
    feedback: Arc<dyn FeedbackStore>,
}

impl ContextAssembler {
    pub fn new(
        profiles: Arc<dyn ProfileProvider>,
        stats: Arc<dyn StatsProvider>,
        feedback: Arc<dyn FeedbackStore>,
    ) -> Self {
        Self {
            profiles,
            stats,
            feedback,
        }
    }

    /// Reject a window outside [MIN_WINDOW_DAYS, MAX_WINDOW_DAYS].
    ///
    /// Rejection rather than clamping keeps the contract deterministic and
    /// testable; the message is safe to surface verbatim.
    pub fn validate_window(days: u32) -> Result<u32> {
        if !(MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(CoachError::InvalidRequest(format!(
                "days must be between {} and {}, got {}",
                MIN_WINDOW_DAYS, MAX_WINDOW_DAYS, days
            )));
        }
        Ok(days)
    }

    /// Fresh profile snapshot; unknown user is DataUnavailable
    pub async fn user_context(&self, user_id: i64) -> Result<UserContext> {
        self.profiles
            .profile(user_id)
            .await?
            .ok_or_else(|| CoachError::DataUnavailable(format!("user {} not found", user_id)))
    }

    /// Aggregate the trailing window. None when the window holds no
    /// sessions at all.
    pub async fn window_snapshot(&self, user_id: i64, days: u32) -> Result<Option<StatsSnapshot>> {
        let days = Self::validate_window(days)?;
        let sessions = self.stats.sessions_in_window(user_id, days).await?;
        Ok(aggregate_window(&sessions, Utc::now().date_naive()))
    }

    /// Today's counts for the daily-advice, motivation, and session-summary
    /// paths
    pub async fn today_stats(&self, user_id: i64) -> Result<DailyStats> {
        let sessions = self.stats.sessions_in_window(user_id, 1).await?;
        Ok(aggregate_today(&sessions, Utc::now().date_naive()))
    }

    /// Recent feedback distilled for prompt context
    pub async fn feedback_history(&self, user_id: i64) -> Result<FeedbackHistory> {
        let records = self
            .feedback
            .recent_for_user(user_id, FEEDBACK_HISTORY_LIMIT)
            .await?;
        Ok(FeedbackHistory::from_records(&records))
    }

    /// A single session owned by the user; unknown or foreign ids are
    /// DataUnavailable
    pub async fn session(&self, user_id: i64, session_id: i64) -> Result<SessionRecord> {
        self.stats
            .session_by_id(user_id, session_id)
            .await?
            .ok_or_else(|| {
                CoachError::DataUnavailable(format!("session {} not found", session_id))
            })
    }
}

/// Aggregate a window of sessions into a snapshot.
///
/// Minute totals, breakdowns, and the streak count completed work only;
/// cancelled sessions contribute to counts and the completion rate.
pub fn aggregate_window(sessions: &[SessionRecord], today: NaiveDate) -> Option<StatsSnapshot> {
    if sessions.is_empty() {
        return None;
    }

    let completed: Vec<&SessionRecord> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .collect();
    let cancelled_count = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Cancelled)
        .count() as u32;

    let mut daily_breakdown = std::collections::BTreeMap::new();
    let mut category_breakdown = std::collections::BTreeMap::new();
    let mut active_days = BTreeSet::new();

    for session in &completed {
        let day = session.started_at.date_naive();
        *daily_breakdown.entry(day).or_insert(0u32) += session.duration_minutes;
        active_days.insert(day);

        let entry = category_breakdown
            .entry(session.category.clone())
            .or_insert(CategoryStats::default());
        entry.sessions += 1;
        entry.minutes += session.duration_minutes;
    }

    let total_minutes: u32 = completed.iter().map(|s| s.duration_minutes).sum();
    let best_day_minutes = daily_breakdown.values().copied().max().unwrap_or(0);
    let worst_day_minutes = daily_breakdown.values().copied().min().unwrap_or(0);

    Some(StatsSnapshot {
        total_sessions: sessions.len() as u32,
        completed_sessions: completed.len() as u32,
        cancelled_sessions: cancelled_count,
        total_minutes,
        completion_rate: StatsSnapshot::completion_rate_of(
            completed.len() as u32,
            sessions.len() as u32,
        ),
        daily_breakdown,
        category_breakdown,
        streak_days: compute_streak(&active_days, today),
        best_day_minutes,
        worst_day_minutes,
    })
}

/// Today's slice of the same aggregation
pub fn aggregate_today(sessions: &[SessionRecord], today: NaiveDate) -> DailyStats {
    let mut stats = DailyStats::default();

    for session in sessions {
        if session.started_at.date_naive() != today {
            continue;
        }
        match session.status {
            SessionStatus::Completed => {
                stats.completed_sessions += 1;
                stats.total_minutes_today += session.duration_minutes;
                let entry = stats
                    .category_breakdown
                    .entry(session.category.clone())
                    .or_insert(CategoryStats::default());
                entry.sessions += 1;
                entry.minutes += session.duration_minutes;
            }
            SessionStatus::Cancelled => stats.cancelled_sessions += 1,
        }
    }

    stats
}

/// Consecutive active days ending today. A day without completed work ends
/// the streak immediately, so a quiet today means zero.
fn compute_streak(active_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;

    while active_days.contains(&day) {
        streak += 1;
        day = day - Duration::days(1);
    }

    streak
}
