use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::SessionScope,
    service::SessionService,
    types::{LoginRequest, LoginResponse, LogoutRequest, LogoutResponse},
};
use crate::shared::{AppError, AppState};
use crate::user::UserService;

/// HTTP handler for user login
///
/// POST /api/auth/login
/// Verifies credentials and issues a user-scoped session token
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!(username = %request.username, "Processing login");

    let user_service = UserService::new(Arc::clone(&state.user_repository));
    let user_id = user_service
        .verify_credentials(&request.username, &request.password)
        .await?;

    let session_service = SessionService::new(
        Arc::clone(&state.session_repository),
        state.session_config.clone(),
    );
    let session = session_service
        .issue_session(SessionScope::User(user_id))
        .await?;

    info!(user_id = %user_id, "Login successful");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        session_token: session.session_token,
    }))
}

/// HTTP handler for admin login
///
/// POST /api/auth/admin/login
/// Checks the static admin credentials and issues an admin-scoped session
#[instrument(name = "admin_login", skip(state, request))]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("Processing admin login");

    if !state
        .admin_credentials
        .verify(&request.username, &request.password)
    {
        warn!("Admin login rejected");
        return Err(AppError::Unauthorized(
            "Invalid admin credentials".to_string(),
        ));
    }

    let session_service = SessionService::new(
        Arc::clone(&state.session_repository),
        state.session_config.clone(),
    );
    let session = session_service.issue_session(SessionScope::Admin).await?;

    info!("Admin login successful");

    Ok(Json(LoginResponse {
        success: true,
        message: "Admin login successful".to_string(),
        session_token: session.session_token,
    }))
}

/// HTTP handler for logout
///
/// POST /api/auth/logout
/// Revokes the supplied session token
#[instrument(name = "logout", skip(state, request))]
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> Result<Json<LogoutResponse>, AppError> {
    info!("Processing logout");

    let session_service = SessionService::new(
        Arc::clone(&state.session_repository),
        state.session_config.clone(),
    );
    session_service
        .revoke_session(&request.session_token)
        .await?;

    Ok(Json(LogoutResponse {
        success: true,
        message: "Logout successful".to_string(),
    }))
}
