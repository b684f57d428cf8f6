use std::sync::Arc;
use tracing::{info, instrument};

use super::models::{DashboardStats, SentimentDistribution};
use crate::feedback::repository::FeedbackRepository;
use crate::shared::AppError;
use crate::user::repository::UserRepository;

/// Service computing dashboard statistics over the user and feedback stores
pub struct StatsService {
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    feedback_repository: Arc<dyn FeedbackRepository + Send + Sync>,
}

impl StatsService {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        feedback_repository: Arc<dyn FeedbackRepository + Send + Sync>,
    ) -> Self {
        Self {
            user_repository,
            feedback_repository,
        }
    }

    /// Computes totals, sentiment distribution, and the average rating.
    /// The average is rounded to 2 decimal places and is 0.0 with no feedback.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let total_users = self.user_repository.count_users().await?;
        let total_feedback = self.feedback_repository.count_feedback().await?;
        let counts = self.feedback_repository.sentiment_counts().await?;
        let average = self.feedback_repository.average_rating().await?;

        let stats = DashboardStats {
            total_users,
            total_feedback,
            sentiment_distribution: SentimentDistribution::from_counts(&counts),
            average_rating: average.map(round_to_hundredths).unwrap_or(0.0),
        };

        info!(
            total_users = stats.total_users,
            total_feedback = stats.total_feedback,
            average_rating = stats.average_rating,
            "Dashboard stats computed"
        );
        Ok(stats)
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
