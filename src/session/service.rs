use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{SessionModel, SessionScope},
    repository::SessionRepository,
    token::SessionConfig,
    types::ValidatedSession,
};
use crate::shared::AppError;

/// Service for the session lifecycle: issue, validate, revoke, sweep
pub struct SessionService {
    repository: Arc<dyn SessionRepository + Send + Sync>,
    config: SessionConfig,
}

impl SessionService {
    pub fn new(repository: Arc<dyn SessionRepository + Send + Sync>, config: SessionConfig) -> Self {
        Self { repository, config }
    }

    /// Issues a new session for the given scope and stores it
    #[instrument(skip(self))]
    pub async fn issue_session(&self, scope: SessionScope) -> Result<SessionModel, AppError> {
        let session = SessionModel::new(scope, self.config.expiry_hours);
        self.repository.create_session(&session).await?;

        info!(
            session_id = %session.id,
            is_admin = session.scope.is_admin(),
            expires_at = %session.expires_at,
            "Session issued"
        );
        Ok(session)
    }

    /// Validates a session token against the store.
    ///
    /// Expiry is a read-time check only; expired rows are left in place for
    /// the background sweep. Unknown, expired, and empty tokens all return
    /// the same invalid result.
    #[instrument(skip(self, token))]
    pub async fn validate_session(&self, token: &str) -> Result<ValidatedSession, AppError> {
        if token.is_empty() {
            return Ok(ValidatedSession::invalid());
        }

        match self.repository.get_session_by_token(token).await? {
            Some(session) => {
                if session.is_expired() {
                    warn!(session_id = %session.id, "Session found but has expired");
                    return Ok(ValidatedSession::invalid());
                }

                info!(session_id = %session.id, "Session validated successfully");
                Ok(ValidatedSession::from_scope(&session.scope))
            }
            None => {
                info!("Session token not found - may have been revoked");
                Ok(ValidatedSession::invalid())
            }
        }
    }

    /// Revokes a session by deleting its row.
    ///
    /// Revoking a token that no longer matches a row reports failure, so a
    /// second revoke of the same token is an error rather than a no-op.
    #[instrument(skip(self, token))]
    pub async fn revoke_session(&self, token: &str) -> Result<(), AppError> {
        if token.is_empty() {
            return Err(AppError::Validation(
                "No session token provided".to_string(),
            ));
        }

        self.repository.delete_session_by_token(token).await?;

        info!("Session revoked successfully");
        Ok(())
    }

    /// Deletes expired session rows, returning how many were removed
    #[instrument(skip(self))]
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        let removed_count = self.repository.cleanup_expired_sessions().await?;

        info!(
            removed_sessions = removed_count,
            "Expired sessions cleanup completed"
        );
        Ok(removed_count)
    }
}
