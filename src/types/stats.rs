//! User context and session statistics
//!
//! Everything here is an immutable per-request snapshot. Nothing is cached
//! across requests and nothing is written back by this service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Profile attributes relevant to coaching, sourced fresh on every request.
///
/// Sensitive account fields (email, credentials) are deliberately not part
/// of this structure and therefore can never reach a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: i64,

    /// First name only, for personal address in generated text
    pub first_name: String,

    pub age: Option<u32>,
    pub occupation: String,
    pub goal: String,

    /// Daily study target in minutes
    pub daily_target_minutes: u32,
}

/// Outcome of a single pomodoro session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Completed,
    Cancelled,
}

/// One pomodoro session as reported by the statistics provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub user_id: i64,
    pub started_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub category: String,
    pub note: Option<String>,
    pub status: SessionStatus,
}

/// Per-category session/minute totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub sessions: u32,
    pub minutes: u32,
}

/// Aggregated statistics over a trailing window of days.
///
/// `daily_breakdown` is sparse: days without completed work are absent, not
/// zero. Keys are ordered by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_sessions: u32,
    pub completed_sessions: u32,
    pub cancelled_sessions: u32,
    pub total_minutes: u32,

    /// Completed / total, rounded to an integer percentage in [0, 100]
    pub completion_rate: u8,

    pub daily_breakdown: BTreeMap<NaiveDate, u32>,
    pub category_breakdown: BTreeMap<String, CategoryStats>,

    /// Consecutive days (ending today) with at least one completed session
    pub streak_days: u32,

    pub best_day_minutes: u32,
    pub worst_day_minutes: u32,
}

/// Today's statistics, the input for daily advice, motivation, and
/// session-summary prompts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyStats {
    pub completed_sessions: u32,
    pub cancelled_sessions: u32,
    pub total_minutes_today: u32,
    pub category_breakdown: BTreeMap<String, CategoryStats>,
}

impl StatsSnapshot {
    /// Completed-vs-total percentage, rounded, clamped to [0, 100]
    pub fn completion_rate_of(completed: u32, total: u32) -> u8 {
        if total == 0 {
            return 0;
        }
        let rate = (completed as f64 / total as f64 * 100.0).round();
        rate.clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_completion_rate_bounds() {
        assert_eq!(StatsSnapshot::completion_rate_of(0, 0), 0);
        assert_eq!(StatsSnapshot::completion_rate_of(5, 5), 100);
        assert_eq!(StatsSnapshot::completion_rate_of(5, 6), 83);
        assert_eq!(StatsSnapshot::completion_rate_of(1, 3), 33);
    }

    #[test]
    fn test_daily_breakdown_is_date_ordered() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(NaiveDate::from_ymd_opt(2025, 1, 22).unwrap(), 30);
        breakdown.insert(NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(), 90);
        breakdown.insert(NaiveDate::from_ymd_opt(2025, 1, 21).unwrap(), 45);

        let days: Vec<_> = breakdown.keys().collect();
        assert_eq!(days[0].day(), 20);
        assert_eq!(days[2].day(), 22);
    }
}
