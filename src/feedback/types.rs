use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::Sentiment;

/// Request payload for submitting feedback
///
/// Rating and comment stay optional here so the service can report every
/// validation problem in one combined message instead of failing
/// deserialization on the first.
#[derive(Debug, Deserialize)]
pub struct FeedbackSubmitRequest {
    #[serde(default)]
    pub session_token: String,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// Response for successful feedback submission
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackSubmitResponse {
    pub success: bool,
    pub message: String,
    pub feedback_id: Uuid,
    pub sentiment: Option<Sentiment>,
}

/// Conjunctive filter set for feedback queries; empty means "all records"
#[derive(Debug, Clone, Default)]
pub struct FeedbackFilter {
    pub sentiment: Option<Sentiment>,
    pub rating: Option<i32>,
    pub search: Option<String>,
}

/// Query parameters for the admin feedback listing
#[derive(Debug, Deserialize)]
pub struct FeedbackListQuery {
    #[serde(default)]
    pub session_token: String,
    pub sentiment: Option<Sentiment>,
    pub rating: Option<i32>,
    pub search: Option<String>,
}

impl FeedbackListQuery {
    pub fn into_filter(self) -> FeedbackFilter {
        FeedbackFilter {
            sentiment: self.sentiment,
            rating: self.rating,
            search: self.search,
        }
    }
}

/// A feedback row joined with the submitting user's username at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub rating: i32,
    pub comment: String,
    pub sentiment: Option<Sentiment>,
    pub created_at: DateTime<Utc>,
}

/// Response for the admin feedback listing
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackListResponse {
    pub success: bool,
    pub feedback: Vec<FeedbackRecord>,
}
