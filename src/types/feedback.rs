//! Feedback records and history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::trigger::AdviceType;

/// One like/dislike verdict on a suggested technique. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub user_id: i64,
    pub technique: String,
    pub liked: bool,

    /// Only meaningful when liked is false; dropped otherwise
    pub rejection_reason: Option<String>,

    pub advice_type: AdviceType,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn new(
        user_id: i64,
        technique: String,
        liked: bool,
        rejection_reason: Option<String>,
        advice_type: AdviceType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            technique,
            liked,
            // A reason only makes sense for a rejection
            rejection_reason: if liked { None } else { rejection_reason },
            advice_type,
            created_at: Utc::now(),
        }
    }
}

/// Recent feedback distilled into prompt context.
///
/// Rejected techniques are forbidden in future suggestions; liked ones steer
/// the model toward similar approaches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackHistory {
    pub liked_techniques: Vec<String>,
    pub disliked_techniques: Vec<String>,
    pub last_suggested_technique: Option<String>,
}

impl FeedbackHistory {
    /// Build history from records ordered newest first.
    ///
    /// Keeps at most five liked and five disliked techniques, deduplicated
    /// with order preserved.
    pub fn from_records(records: &[FeedbackRecord]) -> Self {
        let mut liked = Vec::new();
        let mut disliked = Vec::new();

        for record in records {
            let bucket = if record.liked { &mut liked } else { &mut disliked };
            if !bucket.contains(&record.technique) {
                bucket.push(record.technique.clone());
            }
        }
        liked.truncate(5);
        disliked.truncate(5);

        Self {
            liked_techniques: liked,
            disliked_techniques: disliked,
            last_suggested_technique: records.first().map(|r| r.technique.clone()),
        }
    }
}
