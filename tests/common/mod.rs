//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use pomocoach::coach::{CoachOrchestrator, FeedbackRecorder};
use pomocoach::context::{ContextAssembler, InMemoryDataStore};
use pomocoach::gateway::{HealthReport, ModelTier, TextGenerator};
use pomocoach::http::AppContext;
use pomocoach::types::{SessionRecord, SessionStatus, UserContext};
use pomocoach::Result;

/// Gateway fake that pops pre-seeded responses and counts calls
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str, _tier: ModelTier) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(pomocoach::CoachError::Unavailable(
                    "script exhausted".into(),
                ))
            })
    }

    fn model_tag(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => "fake-fast",
            ModelTier::Heavy => "fake-heavy",
        }
    }

    async fn health(&self) -> HealthReport {
        HealthReport {
            healthy: true,
            model: Some("fake-fast".to_string()),
            error: None,
            checked_at: Utc::now(),
        }
    }
}

/// Gateway fake that answers by tier, for tests with interleaved
/// operations where pop order would be racy
pub struct PerTierGenerator {
    pub fast_response: String,
    pub heavy_response: String,
}

#[async_trait]
impl TextGenerator for PerTierGenerator {
    async fn generate(&self, _prompt: &str, tier: ModelTier) -> Result<String> {
        Ok(match tier {
            ModelTier::Fast => self.fast_response.clone(),
            ModelTier::Heavy => self.heavy_response.clone(),
        })
    }

    fn model_tag(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => "fake-fast",
            ModelTier::Heavy => "fake-heavy",
        }
    }

    async fn health(&self) -> HealthReport {
        HealthReport {
            healthy: true,
            model: Some("fake-fast".to_string()),
            error: None,
            checked_at: Utc::now(),
        }
    }
}

/// A store seeded with one user, a bearer token, and a study history:
/// 5 completed sessions of 30 minutes over a 4-day streak plus one
/// cancellation (completion rate 83%)
pub fn seeded_store() -> Arc<InMemoryDataStore> {
    let store = Arc::new(InMemoryDataStore::new());
    store.insert_profile(UserContext {
        user_id: 7,
        first_name: "Deniz".to_string(),
        age: Some(21),
        occupation: "University student".to_string(),
        goal: "Final exams".to_string(),
        daily_target_minutes: 120,
    });
    store.insert_token("deniz-token", 7);

    let now = Utc::now();
    let mut id = 0;
    let mut add = |days_ago: i64, status: SessionStatus| {
        id += 1;
        store.insert_session(SessionRecord {
            id,
            user_id: 7,
            started_at: now - Duration::days(days_ago),
            duration_minutes: 30,
            category: "lesson".to_string(),
            note: None,
            status,
        });
    };

    // Two sessions today, one on each of the three days before
    add(0, SessionStatus::Completed);
    add(0, SessionStatus::Completed);
    add(1, SessionStatus::Completed);
    add(2, SessionStatus::Completed);
    add(3, SessionStatus::Completed);
    add(1, SessionStatus::Cancelled);

    store
}

pub fn app_context(
    store: Arc<InMemoryDataStore>,
    gateway: Arc<dyn TextGenerator>,
) -> Arc<AppContext> {
    let assembler = ContextAssembler::new(store.clone(), store.clone(), store.clone());
    let orchestrator = Arc::new(CoachOrchestrator::new(assembler, gateway));
    let recorder = FeedbackRecorder::new(store.clone(), orchestrator.clone());
    Arc::new(AppContext {
        orchestrator,
        recorder,
        identity: store,
    })
}

pub fn daily_advice_json() -> String {
    serde_json::json!({
        "technique": "Active Recall",
        "why_this_works": "Testing yourself beats rereading.",
        "steps": ["Close the book", "Write what you remember", "Check the gaps"],
        "duration_suggestion": "25 minutes on, 5 off, four rounds",
        "motivational_note": "Five sessions banked, strong streak.",
        "category_focus": "lesson is carrying the week, keep it first"
    })
    .to_string()
}

pub fn weekly_report_json() -> String {
    serde_json::json!({
        "week_summary": "Consistent days with one slip.",
        "strengths": ["Daily streak of four days", "Solid completion rate"],
        "improvements": ["Reduce cancellations", "One longer deep block"],
        "highlight": "Two sessions in a single day",
        "next_week_focus": "Hold the streak at seven days",
        "technique_recommendation": "Spaced Repetition",
        "technique_reason": "Your recall fades after a two-day gap.",
        "motivational_closing": "The streak is yours to keep."
    })
    .to_string()
}
