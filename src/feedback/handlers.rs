use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    service::FeedbackService,
    types::{
        FeedbackListQuery, FeedbackListResponse, FeedbackSubmitRequest, FeedbackSubmitResponse,
    },
};
use crate::session::SessionService;
use crate::shared::{AppError, AppState};

fn session_service(state: &AppState) -> SessionService {
    SessionService::new(
        Arc::clone(&state.session_repository),
        state.session_config.clone(),
    )
}

/// HTTP handler for submitting feedback
///
/// POST /api/feedback
/// Requires a valid user session; admin sessions are refused
#[instrument(name = "submit_feedback", skip(state, request))]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackSubmitRequest>,
) -> Result<Json<FeedbackSubmitResponse>, AppError> {
    let session = session_service(&state)
        .validate_session(&request.session_token)
        .await?;

    if !session.valid {
        warn!("Feedback submission without a valid session");
        return Err(AppError::Unauthorized(
            "Unauthorized: Please login".to_string(),
        ));
    }
    if session.is_admin {
        warn!("Admin session attempted to submit feedback");
        return Err(AppError::Forbidden(
            "Admins cannot submit feedback".to_string(),
        ));
    }
    // A valid non-admin session always carries a user id
    let user_id = session.user_id.ok_or(AppError::Internal)?;

    let service = FeedbackService::new(
        Arc::clone(&state.feedback_repository),
        Arc::clone(&state.sentiment_classifier),
    );
    let (feedback_id, sentiment) = service
        .submit_feedback(user_id, request.rating, request.comment.as_deref().unwrap_or(""))
        .await?;

    info!(feedback_id = %feedback_id, "Feedback accepted");

    Ok(Json(FeedbackSubmitResponse {
        success: true,
        message: "Feedback submitted successfully".to_string(),
        feedback_id,
        sentiment,
    }))
}

/// HTTP handler for the admin feedback listing
///
/// GET /api/feedback?session_token=...&sentiment=...&rating=...&search=...
/// Requires a valid admin session; filters are conjunctive
#[instrument(name = "list_feedback", skip(state, query))]
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<FeedbackListQuery>,
) -> Result<Json<FeedbackListResponse>, AppError> {
    let session = session_service(&state)
        .validate_session(&query.session_token)
        .await?;

    if !session.valid || !session.is_admin {
        warn!("Feedback listing without a valid admin session");
        return Err(AppError::Forbidden(
            "Unauthorized: Admin access required".to_string(),
        ));
    }

    let service = FeedbackService::new(
        Arc::clone(&state.feedback_repository),
        Arc::clone(&state.sentiment_classifier),
    );
    let feedback = service.query_feedback(&query.into_filter()).await?;

    Ok(Json(FeedbackListResponse {
        success: true,
        feedback,
    }))
}
