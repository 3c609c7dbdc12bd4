//! Prompt construction for each artifact type
//!
//! Builders are deterministic: identical inputs render identical text, with
//! no randomness and no clock reads. Every prompt embeds an explicit JSON
//! template for its artifact so the model is steered toward parseable
//! output, and carries only the requesting user's data.

use crate::types::{
    ArtifactKind, CategoryStats, DailyStats, FeedbackHistory, MotivationTrigger, SessionRecord,
    StatsSnapshot, UserContext,
};
use std::collections::BTreeMap;

/// A fully-rendered model request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: ArtifactKind,
    pub text: String,
}

/// Coaching persona and behaviour rules, prepended to every request
const SYSTEM_PREAMBLE: &str = "\
You are the AI productivity coach of a pomodoro study app.

Your job is to analyse the user's study data and profile and respond with \
specific, personal, motivating coaching.

BEHAVIOUR RULES:
1. Be warm, personal and supportive; never robotic.
2. Address the user by first name.
3. Suggest concrete techniques: Pomodoro variations, Feynman Technique, \
Active Recall, Spaced Repetition, Mind Mapping, Cornell Notes, Interleaving.
4. Avoid generic advice like \"work harder\" or \"stay focused\".
5. Never criticise setbacks; reframe them as room to grow.
6. Offer at most 3 suggestions at a time.
7. When JSON is requested, return ONLY JSON with no extra text.";

/// Output-format discipline, appended to every request
const JSON_FORMAT_SUFFIX: &str = "\
[FORMAT] Respond with valid JSON only. No markdown fences, no commentary. \
The response must start with { and end with }.";

fn render(kind: ArtifactKind, body: String) -> Prompt {
    Prompt {
        kind,
        text: format!("{}\n\n{}\n\n{}", SYSTEM_PREAMBLE, body.trim(), JSON_FORMAT_SUFFIX),
    }
}

fn format_categories(breakdown: &BTreeMap<String, CategoryStats>) -> String {
    if breakdown.is_empty() {
        return "no category data yet".to_string();
    }
    breakdown
        .iter()
        .map(|(name, stats)| format!("{}: {} sessions / {} min", name, stats.sessions, stats.minutes))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_techniques(techniques: &[String]) -> String {
    if techniques.is_empty() {
        return "none yet".to_string();
    }
    techniques.join(", ")
}

fn completion_rate_line(completed: u32, total: u32) -> String {
    if total == 0 {
        return "no data".to_string();
    }
    format!("{}%", StatsSnapshot::completion_rate_of(completed, total))
}

/// Qualitative banding of today's performance. The model reasons better
/// about a described situation than about raw counts alone.
fn assess_performance(stats: &DailyStats, target_minutes: u32) -> &'static str {
    if stats.total_minutes_today == 0 && stats.completed_sessions == 0 {
        return "no study activity yet today";
    }

    let goal_ratio = if target_minutes > 0 {
        stats.total_minutes_today as f64 / target_minutes as f64
    } else {
        0.0
    };
    let attempts = stats.completed_sessions + stats.cancelled_sessions;
    let cancel_ratio = if attempts > 0 {
        stats.cancelled_sessions as f64 / attempts as f64
    } else {
        0.0
    };

    if goal_ratio >= 1.0 && cancel_ratio < 0.2 {
        "above target, a very strong day"
    } else if goal_ratio >= 0.7 && cancel_ratio < 0.3 {
        "close to target, a good day"
    } else if goal_ratio >= 0.4 {
        "below target, middling output"
    } else if cancel_ratio > 0.5 {
        "high cancel rate, focus is slipping"
    } else {
        "low output, motivation support needed"
    }
}

fn profile_block(user: &UserContext) -> String {
    let age_line = user
        .age
        .map(|age| format!("\n- Age: {}", age))
        .unwrap_or_default();
    format!(
        "User profile:\n\
         - Name: {}\n\
         - Goal: {}\n\
         - Occupation: {}\n\
         - Daily study target: {} minutes{}",
        user.first_name, user.goal, user.occupation, user.daily_target_minutes, age_line
    )
}

/// Daily study-technique recommendation prompt
pub fn daily_advice(
    user: &UserContext,
    today: &DailyStats,
    feedback: &FeedbackHistory,
    extra_context: Option<&str>,
) -> Prompt {
    let disliked = format_techniques(&feedback.disliked_techniques);
    let remaining = user
        .daily_target_minutes
        .saturating_sub(today.total_minutes_today);
    let focus_line = extra_context
        .map(|ctx| format!("\n- Today's requested focus: {}", ctx))
        .unwrap_or_default();

    let body = format!(
        "{profile}{focus_line}\n\n\
         Today's study data:\n\
         - Completed pomodoros: {completed}\n\
         - Cancelled pomodoros: {cancelled}\n\
         - Completion rate: {rate}\n\
         - Minutes studied today: {minutes}\n\
         - Minutes left to target: {remaining}\n\
         - Category breakdown: {categories}\n\
         - Overall assessment: {performance}\n\n\
         Technique history:\n\
         - Previously liked: {liked}\n\
         - Previously rejected: {disliked}\n\
         - Last suggested: {last}\n\n\
         TASK:\n\
         Pick the single best study technique for {name} today.\n\
         NEVER suggest any rejected technique ({disliked}).\n\
         Prefer approaches similar to liked techniques when there are any.\n\
         Be realistic and encouraging given the assessment above.\n\n\
         Answer in this JSON shape:\n\
         {{\n\
         \x20 \"technique\": \"Technique name (e.g. Pomodoro 25/5, Feynman Technique)\",\n\
         \x20 \"why_this_works\": \"2-3 personal sentences on why this fits {name}\",\n\
         \x20 \"steps\": [\"Step 1 (short and concrete)\", \"Step 2\", \"Step 3\"],\n\
         \x20 \"duration_suggestion\": \"Recommended work/break rhythm for today\",\n\
         \x20 \"motivational_note\": \"1-2 sentences tailored to today's performance\",\n\
         \x20 \"category_focus\": \"Which category to prioritise today and why (1 sentence)\"\n\
         }}",
        profile = profile_block(user),
        focus_line = focus_line,
        completed = today.completed_sessions,
        cancelled = today.cancelled_sessions,
        rate = completion_rate_line(
            today.completed_sessions,
            today.completed_sessions + today.cancelled_sessions
        ),
        minutes = today.total_minutes_today,
        remaining = remaining,
        categories = format_categories(&today.category_breakdown),
        performance = assess_performance(today, user.daily_target_minutes),
        liked = format_techniques(&feedback.liked_techniques),
        disliked = disliked,
        last = feedback
            .last_suggested_technique
            .as_deref()
            .unwrap_or("first suggestion"),
        name = user.first_name,
    );

    render(ArtifactKind::DailyAdvice, body)
}

/// Weekly coaching report prompt. `snapshot` is None when the window held
/// no sessions; the model is then asked for a gentle getting-started
/// report instead of an analysis.
pub fn weekly_report(
    user: &UserContext,
    snapshot: Option<&StatsSnapshot>,
    feedback: &FeedbackHistory,
    days: u32,
) -> Prompt {
    let disliked = format_techniques(&feedback.disliked_techniques);
    let weekly_goal = user.daily_target_minutes * 7;

    let data_block = match snapshot {
        Some(stats) => {
            let goal_achievement = if weekly_goal > 0 {
                (stats.total_minutes as f64 / weekly_goal as f64 * 100.0).round() as u32
            } else {
                0
            };
            let daily_lines = stats
                .daily_breakdown
                .iter()
                .map(|(day, minutes)| format!("  {}: {} minutes", day, minutes))
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                "Data for the last {days} days:\n\
                 - Total pomodoros: {total}\n\
                 - Completed: {completed}\n\
                 - Cancelled: {cancelled}\n\
                 - Completion rate: {rate}%\n\
                 - Total study time: {minutes} minutes\n\
                 - Weekly target reached: {goal_achievement}%\n\
                 - Best day: {best} minutes\n\
                 - Weakest day: {worst} minutes\n\
                 - Active streak: {streak} consecutive days\n\
                 - Category breakdown: {categories}\n\
                 Daily distribution:\n{daily_lines}",
                days = days,
                total = stats.total_sessions,
                completed = stats.completed_sessions,
                cancelled = stats.cancelled_sessions,
                rate = stats.completion_rate,
                minutes = stats.total_minutes,
                goal_achievement = goal_achievement,
                best = stats.best_day_minutes,
                worst = stats.worst_day_minutes,
                streak = stats.streak_days,
                categories = format_categories(&stats.category_breakdown),
                daily_lines = daily_lines,
            )
        }
        None => format!(
            "Data for the last {} days: no recorded study sessions.\n\
             There is nothing to analyse yet; acknowledge that honestly and \
             write a gentle getting-started report instead of inventing numbers.",
            days
        ),
    };

    let body = format!(
        "{profile}\n- Weekly target: {weekly_goal} minutes\n\n\
         {data_block}\n\n\
         Technique history:\n\
         - Liked: {liked}\n\
         - Rejected: {disliked}\n\n\
         TASK:\n\
         Review {name}'s period thoroughly. Ground every claim in the data \
         above; be honest but constructive, and use growth language instead \
         of criticism. Set one concrete, actionable direction for next week.\n\
         NEVER recommend a rejected technique ({disliked}).\n\n\
         Answer in this JSON shape:\n\
         {{\n\
         \x20 \"week_summary\": \"Warm 2-3 sentence summary addressed to {name}\",\n\
         \x20 \"strengths\": [\"What went well 1\", \"What went well 2\"],\n\
         \x20 \"improvements\": [\"Area to develop 1\", \"Area to develop 2\"],\n\
         \x20 \"highlight\": \"The single most notable achievement of the period\",\n\
         \x20 \"next_week_focus\": \"The top priority and concrete goal for next week\",\n\
         \x20 \"technique_recommendation\": \"Study technique recommended for next week\",\n\
         \x20 \"technique_reason\": \"Why this technique, tied to this period's data\",\n\
         \x20 \"motivational_closing\": \"A sincere closing message for {name}\"\n\
         }}",
        profile = profile_block(user),
        weekly_goal = weekly_goal,
        data_block = data_block,
        liked = format_techniques(&feedback.liked_techniques),
        disliked = disliked,
        name = user.first_name,
    );

    render(ArtifactKind::WeeklyReport, body)
}

fn trigger_situation(
    trigger: MotivationTrigger,
    user: &UserContext,
    today: &DailyStats,
) -> String {
    match trigger {
        MotivationTrigger::LowPerformance => format!(
            "Studied {} minutes today against a {} minute target. The goal \
             is still out of reach and motivation support is needed.",
            today.total_minutes_today, user.daily_target_minutes
        ),
        MotivationTrigger::HighCancelRate => format!(
            "Cancelled {} sessions today and completed only {}. Focus is \
             slipping; redirect gently.",
            today.cancelled_sessions, today.completed_sessions
        ),
        MotivationTrigger::UserRequest => format!(
            "Studied {} minutes today and asked for a motivational push; \
             deliver an empowering message.",
            today.total_minutes_today
        ),
        MotivationTrigger::StreakBroken => "The consecutive-day study streak just ended. \
             Encourage a restart; make continuing matter more than the lost streak."
            .to_string(),
        MotivationTrigger::GoalAchieved => format!(
            "Studied {} minutes today and beat the {} minute daily target! \
             Celebrate and seed inspiration for tomorrow.",
            today.total_minutes_today, user.daily_target_minutes
        ),
    }
}

/// Motivation message prompt, adapted to the trigger
pub fn motivation(
    user: &UserContext,
    today: &DailyStats,
    trigger: MotivationTrigger,
    user_note: Option<&str>,
) -> Prompt {
    let note_line = user_note
        .map(|note| format!("\nUser note: \"{}\"", note))
        .unwrap_or_default();

    let body = format!(
        "{profile}\n\n\
         Situation ({tag}): {situation}{note_line}\n\n\
         TASK:\n\
         Write a sincere, empowering motivation message for {name} tailored \
         to this exact situation.\n\
         - No stock phrases (\"every day is a new chance\" and similar).\n\
         - Tie the message to the goal: {goal}.\n\
         - Offer one small concrete next step.\n\
         - Stay under 150 words.\n\n\
         Answer in this JSON shape:\n\
         {{\n\
         \x20 \"title\": \"Short title with a fitting emoji\",\n\
         \x20 \"message\": \"The main message for {name}, 2-4 warm sentences\",\n\
         \x20 \"action\": \"One small concrete step to take right now\",\n\
         \x20 \"reminder\": \"One sentence linking back to the goal\",\n\
         \x20 \"trigger\": \"{tag}\"\n\
         }}",
        profile = profile_block(user),
        tag = trigger.as_str(),
        situation = trigger_situation(trigger, user, today),
        note_line = note_line,
        name = user.first_name,
        goal = user.goal,
    );

    render(ArtifactKind::Motivation, body)
}

/// Replacement-technique prompt after a rejection
pub fn alternative_technique(
    user: &UserContext,
    rejected_technique: &str,
    rejection_reason: Option<&str>,
    feedback: &FeedbackHistory,
) -> Prompt {
    let reason_line = match rejection_reason {
        Some(reason) => format!("Rejection reason: {}", reason),
        None => "No rejection reason given.".to_string(),
    };

    // The union of everything ever rejected, with the fresh rejection first
    let mut all_rejected = vec![rejected_technique.to_string()];
    for technique in &feedback.disliked_techniques {
        if !technique.eq_ignore_ascii_case(rejected_technique) {
            all_rejected.push(technique.clone());
        }
    }
    let forbidden = all_rejected.join(", ");

    let body = format!(
        "{profile}\n\n\
         Feedback state:\n\
         - Just rejected: \"{rejected}\"\n\
         - {reason_line}\n\
         - All rejected techniques so far: {forbidden}\n\
         - Liked techniques: {liked}\n\n\
         TASK:\n\
         {name} did not like \"{rejected}\". Suggest a genuinely different \
         approach.\n\
         NEVER suggest any of: {forbidden}.\n\
         If there are liked techniques, lean toward their style without \
         repeating them.\n\n\
         Answer in this JSON shape:\n\
         {{\n\
         \x20 \"technique\": \"A clearly different technique name\",\n\
         \x20 \"why_different\": \"1-2 sentences on how it differs from {rejected}\",\n\
         \x20 \"why_suits_you\": \"Why it fits {name} and the goal: {goal}\",\n\
         \x20 \"steps\": [\"How to apply it - step 1 (concrete)\", \"Step 2\", \"Step 3\"],\n\
         \x20 \"try_suggestion\": \"A concrete scenario for trying it today, 1-2 sentences\"\n\
         }}",
        profile = profile_block(user),
        rejected = rejected_technique,
        reason_line = reason_line,
        forbidden = forbidden,
        liked = format_techniques(&feedback.liked_techniques),
        name = user.first_name,
        goal = user.goal,
    );

    render(ArtifactKind::AlternativeTechnique, body)
}

/// Instant post-session reaction prompt
pub fn session_summary(
    user: &UserContext,
    session: &SessionRecord,
    today: &DailyStats,
) -> Prompt {
    let remaining = user
        .daily_target_minutes
        .saturating_sub(today.total_minutes_today);
    let progress_pct = if user.daily_target_minutes > 0 {
        (today.total_minutes_today * 100 / user.daily_target_minutes).min(100)
    } else {
        0
    };
    let note_line = match &session.note {
        Some(note) => format!("Session note: \"{}\"", note),
        None => "No session note.".to_string(),
    };

    let body = format!(
        "{name} just completed a {duration} minute {category} session.\n\
         {note_line}\n\n\
         Daily progress:\n\
         - Today in total: {minutes} of {target} target minutes\n\
         - Progress: {progress_pct}%\n\
         - Left to target: {remaining} minutes\n\
         - Sessions completed today: {completed}\n\n\
         Goal: {goal}\n\n\
         TASK:\n\
         Give short, warm, energising feedback on the finished session. \
         Keep it quick; no long analysis.\n\n\
         Answer in this JSON shape:\n\
         {{\n\
         \x20 \"reaction\": \"Quick reaction to finishing (emoji + 1 sentence)\",\n\
         \x20 \"progress_note\": \"1 sincere sentence about today's progress\",\n\
         \x20 \"next_step\": \"Concrete suggestion right now: break length, next session topic, or call it a day (1-2 sentences)\"\n\
         }}",
        name = user.first_name,
        duration = session.duration_minutes,
        category = session.category,
        note_line = note_line,
        minutes = today.total_minutes_today,
        target = user.daily_target_minutes,
        progress_pct = progress_pct,
        remaining = remaining,
        completed = today.completed_sessions,
        goal = user.goal,
    );

    render(ArtifactKind::SessionSummary, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionStatus;
    use chrono::Utc;

    fn user() -> UserContext {
        UserContext {
            user_id: 1,
            first_name: "Deniz".to_string(),
            age: Some(21),
            occupation: "University student".to_string(),
            goal: "Final exams".to_string(),
            daily_target_minutes: 120,
        }
    }

    fn today_stats() -> DailyStats {
        DailyStats {
            completed_sessions: 2,
            cancelled_sessions: 1,
            total_minutes_today: 50,
            category_breakdown: BTreeMap::new(),
        }
    }

    #[test]
    fn test_builders_are_deterministic() {
        let stats = today_stats();
        let feedback = FeedbackHistory::default();
        let a = daily_advice(&user(), &stats, &feedback, Some("maths only"));
        let b = daily_advice(&user(), &stats, &feedback, Some("maths only"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_daily_advice_embeds_schema_and_data() {
        let prompt = daily_advice(&user(), &today_stats(), &FeedbackHistory::default(), None);
        assert_eq!(prompt.kind, ArtifactKind::DailyAdvice);
        for key in [
            "\"technique\"",
            "\"why_this_works\"",
            "\"steps\"",
            "\"duration_suggestion\"",
            "\"motivational_note\"",
            "\"category_focus\"",
        ] {
            assert!(prompt.text.contains(key), "missing {}", key);
        }
        // 120 target minus 50 studied
        assert!(prompt.text.contains("Minutes left to target: 70"));
        assert!(prompt.text.contains("Deniz"));
        assert!(prompt.text.ends_with("start with { and end with }."));
    }

    #[test]
    fn test_daily_advice_forbids_rejected_techniques() {
        let feedback = FeedbackHistory {
            liked_techniques: vec![],
            disliked_techniques: vec!["Pomodoro 25/5".to_string()],
            last_suggested_technique: None,
        };
        let prompt = daily_advice(&user(), &today_stats(), &feedback, None);
        assert!(prompt
            .text
            .contains("NEVER suggest any rejected technique (Pomodoro 25/5)"));
    }

    #[test]
    fn test_weekly_report_empty_window_describes_absence() {
        let prompt = weekly_report(&user(), None, &FeedbackHistory::default(), 7);
        assert!(prompt.text.contains("no recorded study sessions"));
        assert!(prompt.text.contains("getting-started"));
        assert!(prompt.text.contains("\"week_summary\""));
    }

    #[test]
    fn test_motivation_prompt_names_trigger() {
        let prompt = motivation(
            &user(),
            &today_stats(),
            MotivationTrigger::GoalAchieved,
            Some("feeling great"),
        );
        assert!(prompt.text.contains("goal_achieved"));
        assert!(prompt.text.contains("feeling great"));
        assert!(prompt.text.contains("\"trigger\": \"goal_achieved\""));
    }

    #[test]
    fn test_alternative_prompt_forbids_all_rejections() {
        let feedback = FeedbackHistory {
            liked_techniques: vec!["Active Recall".to_string()],
            disliked_techniques: vec!["Cornell Notes".to_string()],
            last_suggested_technique: Some("Cornell Notes".to_string()),
        };
        let prompt = alternative_technique(
            &user(),
            "Pomodoro 25/5",
            Some("25 minutes feels too long"),
            &feedback,
        );
        assert!(prompt
            .text
            .contains("NEVER suggest any of: Pomodoro 25/5, Cornell Notes"));
        assert!(prompt.text.contains("25 minutes feels too long"));
    }

    #[test]
    fn test_alternative_prompt_dedupes_fresh_rejection() {
        let feedback = FeedbackHistory {
            liked_techniques: vec![],
            disliked_techniques: vec!["pomodoro 25/5".to_string()],
            last_suggested_technique: None,
        };
        let prompt = alternative_technique(&user(), "Pomodoro 25/5", None, &feedback);
        // Case-insensitive duplicate collapses to the fresh spelling
        assert!(prompt.text.contains("All rejected techniques so far: Pomodoro 25/5\n"));
    }

    #[test]
    fn test_session_summary_progress_math() {
        let session = SessionRecord {
            id: 42,
            user_id: 1,
            started_at: Utc::now(),
            duration_minutes: 25,
            category: "lesson".to_string(),
            note: Some("hard chapter".to_string()),
            status: SessionStatus::Completed,
        };
        let prompt = session_summary(&user(), &session, &today_stats());
        assert!(prompt.text.contains("Progress: 41%"));
        assert!(prompt.text.contains("hard chapter"));
        assert!(prompt.text.contains("25 minute lesson session"));
    }

    #[test]
    fn test_performance_banding() {
        let mut stats = today_stats();
        stats.total_minutes_today = 0;
        stats.completed_sessions = 0;
        stats.cancelled_sessions = 0;
        assert_eq!(
            assess_performance(&stats, 120),
            "no study activity yet today"
        );

        stats.total_minutes_today = 130;
        stats.completed_sessions = 5;
        assert_eq!(assess_performance(&stats, 120), "above target, a very strong day");

        stats.total_minutes_today = 10;
        stats.completed_sessions = 1;
        stats.cancelled_sessions = 4;
        assert_eq!(
            assess_performance(&stats, 120),
            "high cancel rate, focus is slipping"
        );
    }
}
