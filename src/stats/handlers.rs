use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::models::StatsResponse;
use super::service::StatsService;
use crate::session::SessionService;
use crate::shared::{AppError, AppState};

/// Query parameters for the stats endpoint
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub session_token: String,
}

/// HTTP handler for the admin dashboard statistics
///
/// GET /api/admin/stats?session_token=...
/// Requires a valid admin session
#[instrument(name = "dashboard_stats", skip(state, query))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let session_service = SessionService::new(
        Arc::clone(&state.session_repository),
        state.session_config.clone(),
    );
    let session = session_service
        .validate_session(&query.session_token)
        .await?;

    if !session.valid || !session.is_admin {
        warn!("Stats request without a valid admin session");
        return Err(AppError::Forbidden(
            "Unauthorized: Admin access required".to_string(),
        ));
    }

    let service = StatsService::new(
        Arc::clone(&state.user_repository),
        Arc::clone(&state.feedback_repository),
    );
    let stats = service.dashboard_stats().await?;

    info!("Dashboard stats served");

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
