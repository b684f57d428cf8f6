use serde::{Deserialize, Serialize};

use crate::feedback::models::Sentiment;

/// Per-label feedback counts; every label is always present, defaulting to 0
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl SentimentDistribution {
    /// Folds grouped (label, count) pairs into the fixed three-key shape
    pub fn from_counts(counts: &[(Sentiment, u64)]) -> Self {
        let mut distribution = Self::default();
        for (sentiment, count) in counts {
            match sentiment {
                Sentiment::Positive => distribution.positive = *count,
                Sentiment::Negative => distribution.negative = *count,
                Sentiment::Neutral => distribution.neutral = *count,
            }
        }
        distribution
    }
}

/// Aggregated dashboard statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_feedback: u64,
    pub sentiment_distribution: SentimentDistribution,
    pub average_rating: f64,
}

/// Response wrapper for the stats endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: DashboardStats,
}
