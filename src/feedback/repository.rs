use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::{FeedbackModel, Sentiment};
use super::types::{FeedbackFilter, FeedbackRecord};
use crate::shared::AppError;
use crate::user::repository::UserRepository;

/// Trait for feedback repository operations
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create_feedback(&self, feedback: &FeedbackModel) -> Result<(), AppError>;
    async fn set_sentiment(&self, feedback_id: Uuid, sentiment: Sentiment) -> Result<(), AppError>;
    async fn query_feedback(&self, filter: &FeedbackFilter)
        -> Result<Vec<FeedbackRecord>, AppError>;
    async fn count_feedback(&self) -> Result<u64, AppError>;
    async fn sentiment_counts(&self) -> Result<Vec<(Sentiment, u64)>, AppError>;
    async fn average_rating(&self) -> Result<Option<f64>, AppError>;
}

/// In-memory implementation of FeedbackRepository for development and testing
///
/// Usernames are resolved through the user repository at query time, the
/// same join the SQL backend performs.
pub struct InMemoryFeedbackRepository {
    entries: RwLock<HashMap<Uuid, FeedbackModel>>,
    user_repository: Arc<dyn UserRepository + Send + Sync>,
}

impl InMemoryFeedbackRepository {
    pub fn new(user_repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            user_repository,
        }
    }

    fn matches(feedback: &FeedbackModel, username: &str, filter: &FeedbackFilter) -> bool {
        if let Some(sentiment) = filter.sentiment {
            if feedback.sentiment != Some(sentiment) {
                return false;
            }
        }
        if let Some(rating) = filter.rating {
            if feedback.rating != rating {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            if !feedback.comment.to_lowercase().contains(&needle)
                && !username.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    #[instrument(skip(self, feedback))]
    async fn create_feedback(&self, feedback: &FeedbackModel) -> Result<(), AppError> {
        debug!(feedback_id = %feedback.id, user_id = %feedback.user_id, "Creating feedback in memory");

        let mut entries = self.entries.write().await;
        entries.insert(feedback.id, feedback.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_sentiment(&self, feedback_id: Uuid, sentiment: Sentiment) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(&feedback_id) {
            Some(feedback) => {
                feedback.sentiment = Some(sentiment);
                debug!(feedback_id = %feedback_id, sentiment = %sentiment, "Sentiment stored in memory");
                Ok(())
            }
            None => {
                warn!(feedback_id = %feedback_id, "Feedback not found for sentiment update");
                Err(AppError::NotFound("Feedback not found".to_string()))
            }
        }
    }

    #[instrument(skip(self, filter))]
    async fn query_feedback(
        &self,
        filter: &FeedbackFilter,
    ) -> Result<Vec<FeedbackRecord>, AppError> {
        let entries = self.entries.read().await;

        let mut records = Vec::new();
        for feedback in entries.values() {
            // Inner join: rows whose user has vanished are dropped
            let user = match self.user_repository.get_user(feedback.user_id).await? {
                Some(user) => user,
                None => continue,
            };

            if Self::matches(feedback, &user.username, filter) {
                records.push(FeedbackRecord {
                    id: feedback.id,
                    user_id: feedback.user_id,
                    username: user.username,
                    rating: feedback.rating,
                    comment: feedback.comment.clone(),
                    sentiment: feedback.sentiment,
                    created_at: feedback.created_at,
                });
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(record_count = records.len(), "Feedback queried from memory");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn count_feedback(&self) -> Result<u64, AppError> {
        let entries = self.entries.read().await;
        Ok(entries.len() as u64)
    }

    #[instrument(skip(self))]
    async fn sentiment_counts(&self) -> Result<Vec<(Sentiment, u64)>, AppError> {
        let entries = self.entries.read().await;

        let mut counts: HashMap<Sentiment, u64> = HashMap::new();
        for feedback in entries.values() {
            if let Some(sentiment) = feedback.sentiment {
                *counts.entry(sentiment).or_insert(0) += 1;
            }
        }

        Ok(counts.into_iter().collect())
    }

    #[instrument(skip(self))]
    async fn average_rating(&self) -> Result<Option<f64>, AppError> {
        let entries = self.entries.read().await;
        if entries.is_empty() {
            return Ok(None);
        }

        let sum: i64 = entries.values().map(|f| f.rating as i64).sum();
        Ok(Some(sum as f64 / entries.len() as f64))
    }
}

/// PostgreSQL implementation of feedback repository
pub struct PostgresFeedbackRepository {
    pool: PgPool,
}

impl PostgresFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for PostgresFeedbackRepository {
    #[instrument(skip(self, feedback))]
    async fn create_feedback(&self, feedback: &FeedbackModel) -> Result<(), AppError> {
        debug!(feedback_id = %feedback.id, user_id = %feedback.user_id, "Creating feedback in database");

        sqlx::query(
            "INSERT INTO feedback (id, user_id, rating, comment, sentiment, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(feedback.id)
        .bind(feedback.user_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .bind(feedback.sentiment.map(|s| s.to_string()))
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create feedback in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(feedback_id = %feedback.id, "Feedback created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_sentiment(&self, feedback_id: Uuid, sentiment: Sentiment) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE feedback SET sentiment = $2 WHERE id = $1")
            .bind(feedback_id)
            .bind(sentiment.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, feedback_id = %feedback_id, "Failed to store sentiment");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(feedback_id = %feedback_id, "Feedback not found for sentiment update");
            return Err(AppError::NotFound("Feedback not found".to_string()));
        }

        debug!(feedback_id = %feedback_id, sentiment = %sentiment, "Sentiment stored in database");
        Ok(())
    }

    #[instrument(skip(self, filter))]
    async fn query_feedback(
        &self,
        filter: &FeedbackFilter,
    ) -> Result<Vec<FeedbackRecord>, AppError> {
        let rows = sqlx::query(
            "SELECT f.id, f.user_id, u.username, f.rating, f.comment, f.sentiment, f.created_at \
             FROM feedback f \
             JOIN users u ON f.user_id = u.id \
             WHERE ($1::TEXT IS NULL OR f.sentiment = $1) \
               AND ($2::INT IS NULL OR f.rating = $2) \
               AND ($3::TEXT IS NULL \
                    OR f.comment ILIKE '%' || $3 || '%' \
                    OR u.username ILIKE '%' || $3 || '%') \
             ORDER BY f.created_at DESC",
        )
        .bind(filter.sentiment.map(|s| s.to_string()))
        .bind(filter.rating)
        .bind(filter.search.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to query feedback from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let records = rows
            .iter()
            .map(|row| {
                let sentiment: Option<String> = row.get("sentiment");
                FeedbackRecord {
                    id: row.get("id"),
                    user_id: row.get("user_id"),
                    username: row.get("username"),
                    rating: row.get("rating"),
                    comment: row.get("comment"),
                    sentiment: sentiment.and_then(|s| s.parse().ok()),
                    created_at: row.get("created_at"),
                }
            })
            .collect();

        Ok(records)
    }

    #[instrument(skip(self))]
    async fn count_feedback(&self) -> Result<u64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM feedback")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to count feedback");
                AppError::DatabaseError(e.to_string())
            })?;

        let count: i64 = row.get("count");
        Ok(count as u64)
    }

    #[instrument(skip(self))]
    async fn sentiment_counts(&self) -> Result<Vec<(Sentiment, u64)>, AppError> {
        let rows = sqlx::query(
            "SELECT sentiment, COUNT(*) AS count FROM feedback \
             WHERE sentiment IS NOT NULL GROUP BY sentiment",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to load sentiment distribution");
            AppError::DatabaseError(e.to_string())
        })?;

        let counts = rows
            .iter()
            .filter_map(|row| {
                let label: String = row.get("sentiment");
                let count: i64 = row.get("count");
                match label.parse::<Sentiment>() {
                    Ok(sentiment) => Some((sentiment, count as u64)),
                    Err(_) => {
                        warn!(label = %label, "Skipping unrecognized sentiment label");
                        None
                    }
                }
            })
            .collect();

        Ok(counts)
    }

    #[instrument(skip(self))]
    async fn average_rating(&self) -> Result<Option<f64>, AppError> {
        let row = sqlx::query("SELECT AVG(rating)::FLOAT8 AS avg_rating FROM feedback")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to compute average rating");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(row.get("avg_rating"))
    }
}
