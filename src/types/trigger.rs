//! Motivation triggers and advice-type tags

use serde::{Deserialize, Serialize};

/// Why a motivation message is being requested.
///
/// The prompt wording adapts to the trigger, and the generated artifact
/// echoes it back so the client can match responses to causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationTrigger {
    /// Below the daily target with some work done
    LowPerformance,

    /// Cancellations dominate today's sessions
    HighCancelRate,

    /// The user asked for a boost
    UserRequest,

    /// A consecutive-day streak just ended
    StreakBroken,

    /// Daily target reached (celebration)
    GoalAchieved,
}

impl MotivationTrigger {
    /// Wire tag, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MotivationTrigger::LowPerformance => "low_performance",
            MotivationTrigger::HighCancelRate => "high_cancel_rate",
            MotivationTrigger::UserRequest => "user_request",
            MotivationTrigger::StreakBroken => "streak_broken",
            MotivationTrigger::GoalAchieved => "goal_achieved",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "low_performance" => Some(MotivationTrigger::LowPerformance),
            "high_cancel_rate" => Some(MotivationTrigger::HighCancelRate),
            "user_request" => Some(MotivationTrigger::UserRequest),
            "streak_broken" => Some(MotivationTrigger::StreakBroken),
            "goal_achieved" => Some(MotivationTrigger::GoalAchieved),
            _ => None,
        }
    }
}

impl Default for MotivationTrigger {
    fn default() -> Self {
        MotivationTrigger::UserRequest
    }
}

/// Which kind of advice a feedback record refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceType {
    Daily,
    Weekly,
    Alternative,
}

impl Default for AdviceType {
    fn default() -> Self {
        AdviceType::Daily
    }
}

/// Classify today's counts into a proactive motivation trigger.
///
/// Pure function used by the client-side nudge scheduler to decide whether
/// to request a motivation message at all; the orchestrator never calls it.
///
/// Priority order:
/// 1. cancel rate > 0.5 with at least 2 sessions → HighCancelRate
/// 2. progress toward the daily target ≥ 100%   → GoalAchieved
/// 3. progress < 30% with some minutes logged   → LowPerformance
/// 4. otherwise                                  → None (no proactive call)
pub fn detect_motivation_trigger(
    cancelled_today: u32,
    completed_today: u32,
    minutes_today: u32,
    daily_target_minutes: u32,
) -> Option<MotivationTrigger> {
    let total = cancelled_today + completed_today;
    let cancel_rate = if total >= 1 {
        cancelled_today as f64 / total as f64
    } else {
        0.0
    };
    let progress_rate = if daily_target_minutes > 0 {
        minutes_today as f64 / daily_target_minutes as f64
    } else {
        0.0
    };

    if cancel_rate > 0.5 && total >= 2 {
        Some(MotivationTrigger::HighCancelRate)
    } else if progress_rate >= 1.0 {
        Some(MotivationTrigger::GoalAchieved)
    } else if progress_rate < 0.3 && minutes_today > 0 {
        Some(MotivationTrigger::LowPerformance)
    } else {
        None
    }
}
