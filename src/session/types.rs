use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::SessionScope;

/// Outcome of validating a session token.
///
/// Invalid tokens (unknown, expired, empty) all collapse into the same
/// `valid: false` shape; callers never learn which case they hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedSession {
    pub valid: bool,
    pub user_id: Option<Uuid>,
    pub is_admin: bool,
}

impl ValidatedSession {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            user_id: None,
            is_admin: false,
        }
    }

    pub fn from_scope(scope: &SessionScope) -> Self {
        Self {
            valid: true,
            user_id: scope.user_id(),
            is_admin: scope.is_admin(),
        }
    }
}

/// Request payload for user and admin login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response for successful login, carrying the bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub session_token: String,
}

/// Request payload for logout
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub session_token: String,
}

/// Response for logout
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}
