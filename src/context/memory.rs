//! In-memory collaborator implementations
//!
//! Backs tests and local development runs. Not intended for production;
//! nothing survives a restart.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::context::providers::{FeedbackStore, IdentityVerifier, ProfileProvider, StatsProvider};
use crate::errors::Result;
use crate::types::{FeedbackRecord, SessionRecord, UserContext};

/// Process-local store implementing every collaborator trait
#[derive(Default)]
pub struct InMemoryDataStore {
    profiles: Mutex<HashMap<i64, UserContext>>,
    sessions: Mutex<Vec<SessionRecord>>,
    feedback: Mutex<Vec<FeedbackRecord>>,
    tokens: Mutex<HashMap<String, i64>>,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_profile(&self, profile: UserContext) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile);
    }

    pub fn insert_session(&self, session: SessionRecord) {
        self.sessions.lock().unwrap().push(session);
    }

    /// Register a bearer token as belonging to a user
    pub fn insert_token(&self, token: &str, user_id: i64) {
        self.tokens.lock().unwrap().insert(token.to_string(), user_id);
    }

    pub fn feedback_count(&self) -> usize {
        self.feedback.lock().unwrap().len()
    }
}

#[async_trait]
impl ProfileProvider for InMemoryDataStore {
    async fn profile(&self, user_id: i64) -> Result<Option<UserContext>> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }
}

#[async_trait]
impl StatsProvider for InMemoryDataStore {
    async fn sessions_in_window(&self, user_id: i64, days: u32) -> Result<Vec<SessionRecord>> {
        let earliest = Utc::now().date_naive() - Duration::days(days as i64 - 1);
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && s.started_at.date_naive() >= earliest)
            .cloned()
            .collect())
    }

    async fn session_by_id(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<Option<SessionRecord>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == session_id && s.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl FeedbackStore for InMemoryDataStore {
    async fn save(&self, record: &FeedbackRecord) -> Result<()> {
        self.feedback.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn recent_for_user(&self, user_id: i64, limit: usize) -> Result<Vec<FeedbackRecord>> {
        let feedback = self.feedback.lock().unwrap();
        Ok(feedback
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IdentityVerifier for InMemoryDataStore {
    async fn verify(&self, token: &str) -> Result<Option<i64>> {
        Ok(self.tokens.lock().unwrap().get(token).copied())
    }
}
