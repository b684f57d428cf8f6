use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::UserService,
    types::{RegisterRequest, RegisterResponse},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for user registration
///
/// POST /api/auth/register
/// Returns the new user's id on success
#[instrument(name = "register", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    info!(username = %request.username, "Registering new user");

    // Use injected repository from app state
    let service = UserService::new(Arc::clone(&state.user_repository));
    let user_id = service
        .register(&request.username, &request.email, &request.password)
        .await?;

    info!(user_id = %user_id, "User registered successfully");

    Ok(Json(RegisterResponse {
        success: true,
        message: "User registered successfully".to_string(),
        user_id,
    }))
}
