use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Coarse polarity label attached to feedback text by the classifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Database model for the feedback table
///
/// Rows are immutable after insert except for the single sentiment write,
/// which fills in the initially unset label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub sentiment: Option<Sentiment>,
    pub created_at: DateTime<Utc>,
}

impl FeedbackModel {
    /// Creates a new feedback model with a generated ID and unset sentiment
    pub fn new(user_id: Uuid, rating: i32, comment: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            rating,
            comment,
            sentiment: None,
            created_at: Utc::now(),
        }
    }
}
