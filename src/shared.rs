use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::feedback::repository::FeedbackRepository;
use crate::feedback::sentiment::SentimentClassifier;
use crate::session::admin::AdminCredentials;
use crate::session::repository::SessionRepository;
use crate::session::token::SessionConfig;
use crate::user::repository::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub session_repository: Arc<dyn SessionRepository + Send + Sync>,
    pub feedback_repository: Arc<dyn FeedbackRepository + Send + Sync>,
    pub sentiment_classifier: Arc<dyn SentimentClassifier + Send + Sync>,
    pub session_config: SessionConfig,
    pub admin_credentials: AdminCredentials,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        feedback_repository: Arc<dyn FeedbackRepository + Send + Sync>,
        sentiment_classifier: Arc<dyn SentimentClassifier + Send + Sync>,
        session_config: SessionConfig,
        admin_credentials: AdminCredentials,
    ) -> Self {
        Self {
            user_repository,
            session_repository,
            feedback_repository,
            sentiment_classifier,
            session_config,
            admin_credentials,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            // Absent tokens surface as 400, matching the logout contract
            AppError::NotFound(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}
