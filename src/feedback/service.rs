use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    models::{FeedbackModel, Sentiment},
    repository::FeedbackRepository,
    sentiment::SentimentClassifier,
    types::{FeedbackFilter, FeedbackRecord},
};
use crate::shared::AppError;

/// Service for submitting and querying feedback
pub struct FeedbackService {
    repository: Arc<dyn FeedbackRepository + Send + Sync>,
    classifier: Arc<dyn SentimentClassifier + Send + Sync>,
}

impl FeedbackService {
    pub fn new(
        repository: Arc<dyn FeedbackRepository + Send + Sync>,
        classifier: Arc<dyn SentimentClassifier + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            classifier,
        }
    }

    /// Validates and persists a feedback submission, then classifies it.
    ///
    /// Validation reports every violated rule in one combined message.
    /// Classification runs after the insert and is best-effort: the returned
    /// sentiment is `None` whenever classification or the sentiment write
    /// failed, and the feedback row stands either way.
    #[instrument(skip(self, comment))]
    pub async fn submit_feedback(
        &self,
        user_id: Uuid,
        rating: Option<i32>,
        comment: &str,
    ) -> Result<(Uuid, Option<Sentiment>), AppError> {
        let mut errors = Vec::new();

        let valid_rating = rating.filter(|r| (1..=5).contains(r));
        if valid_rating.is_none() {
            errors.push("Rating must be between 1 and 5");
        }

        let trimmed = comment.trim();
        if trimmed.is_empty() {
            errors.push("Comment cannot be empty");
        }

        let rating = match (valid_rating, errors.is_empty()) {
            (Some(rating), true) => rating,
            _ => return Err(AppError::Validation(errors.join("; "))),
        };

        let feedback = FeedbackModel::new(user_id, rating, trimmed.to_string());
        self.repository.create_feedback(&feedback).await?;

        let sentiment = self.classify_and_store(feedback.id, trimmed).await;

        info!(
            feedback_id = %feedback.id,
            user_id = %user_id,
            rating = rating,
            "Feedback submitted successfully"
        );
        Ok((feedback.id, sentiment))
    }

    /// Classifies the comment and stores the label on the feedback row.
    /// Returns the sentiment only if it was actually persisted.
    async fn classify_and_store(&self, feedback_id: Uuid, comment: &str) -> Option<Sentiment> {
        let sentiment = match self.classifier.classify(comment) {
            Ok(sentiment) => sentiment,
            Err(e) => {
                warn!(
                    feedback_id = %feedback_id,
                    error = %e,
                    "Sentiment classification failed, leaving sentiment unset"
                );
                return None;
            }
        };

        match self.repository.set_sentiment(feedback_id, sentiment).await {
            Ok(()) => Some(sentiment),
            Err(e) => {
                warn!(
                    feedback_id = %feedback_id,
                    error = %e,
                    "Failed to store sentiment, leaving sentiment unset"
                );
                None
            }
        }
    }

    /// Retrieves feedback matching the filter, newest first
    #[instrument(skip(self, filter))]
    pub async fn query_feedback(
        &self,
        filter: &FeedbackFilter,
    ) -> Result<Vec<FeedbackRecord>, AppError> {
        let records = self.repository.query_feedback(filter).await?;
        info!(record_count = records.len(), "Feedback query completed");
        Ok(records)
    }
}
