use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request payload for user registration
///
/// Fields default to empty so a missing field reports the required-fields
/// message instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response for successful registration
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user_id: Uuid,
}
