use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token;
use crate::shared::AppError;

/// Who a session belongs to.
///
/// A session is either tied to a registered user or it is an admin session
/// with no user row behind it. Making this a tagged variant keeps the
/// "user reference present iff not admin" rule out of runtime checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionScope {
    User(Uuid),
    Admin,
}

impl SessionScope {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            SessionScope::User(user_id) => Some(*user_id),
            SessionScope::Admin => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, SessionScope::Admin)
    }

    /// Reconstructs a scope from the persisted user_id/is_admin column pair.
    /// Rows where the two disagree are refused rather than guessed at.
    pub fn from_columns(user_id: Option<Uuid>, is_admin: bool) -> Result<Self, AppError> {
        match (user_id, is_admin) {
            (Some(user_id), false) => Ok(SessionScope::User(user_id)),
            (None, true) => Ok(SessionScope::Admin),
            _ => Err(AppError::DatabaseError(
                "session row has inconsistent scope columns".to_string(),
            )),
        }
    }
}

/// Database model for the sessions table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionModel {
    pub id: Uuid,
    pub session_token: String,
    pub scope: SessionScope,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionModel {
    /// Creates a new session model with a generated token and timestamps
    pub fn new(scope: SessionScope, expiry_hours: i64) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(expiry_hours);

        Self {
            id: Uuid::new_v4(),
            session_token: token::generate_token(),
            scope,
            created_at: now,
            expires_at,
        }
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
