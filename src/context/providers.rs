//! Collaborator traits
//!
//! Each trait is one external collaborator: profile data, session
//! statistics, feedback persistence, and identity verification. Adapters
//! map their own transport failures into the coaching error taxonomy
//! before returning.

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{FeedbackRecord, SessionRecord, UserContext};

/// Supplies demographic/goal attributes for a user
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// None when the user id is unknown
    async fn profile(&self, user_id: i64) -> Result<Option<UserContext>>;
}

/// Supplies raw pomodoro session rows; aggregation happens in the assembler
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// All sessions of the user started within the trailing `days` calendar
    /// days (today inclusive), regardless of status
    async fn sessions_in_window(&self, user_id: i64, days: u32) -> Result<Vec<SessionRecord>>;

    /// A single session, None when the id is unknown or owned by another
    /// user
    async fn session_by_id(&self, user_id: i64, session_id: i64)
        -> Result<Option<SessionRecord>>;
}

/// Persists feedback verdicts and serves them back, newest first
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn save(&self, record: &FeedbackRecord) -> Result<()>;

    /// Most recent records first, at most `limit`
    async fn recent_for_user(&self, user_id: i64, limit: usize) -> Result<Vec<FeedbackRecord>>;
}

/// Turns a bearer credential into a verified user id.
///
/// Token issuance and expiry live with the auth collaborator; this service
/// only ever sees the verification result.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// None when the credential is missing from, or expired in, the
    /// collaborator's view
    async fn verify(&self, token: &str) -> Result<Option<i64>>;
}
