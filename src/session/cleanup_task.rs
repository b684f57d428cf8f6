use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, instrument};

use super::repository::SessionRepository;
use crate::shared::AppError;

/// Configuration for the session sweep task
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// How often to delete expired session rows
    pub sweep_interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60 * 60), // 1 hour
        }
    }
}

/// Starts the background task that periodically removes expired sessions.
///
/// Validation already treats expired rows as invalid at read time; the sweep
/// only keeps the sessions table from accumulating dead rows.
#[instrument(skip(session_repository))]
pub async fn start_session_sweep(
    session_repository: Arc<dyn SessionRepository + Send + Sync>,
    config: SweepConfig,
) {
    info!(
        sweep_interval_secs = config.sweep_interval.as_secs(),
        "Starting session sweep background task"
    );

    let mut sweep_interval = interval(config.sweep_interval);

    loop {
        sweep_interval.tick().await;

        match sweep_once(&session_repository).await {
            Ok(removed_count) => {
                info!(removed_count = removed_count, "Session sweep completed");
            }
            Err(e) => {
                error!(error = %e, "Session sweep failed");
            }
        }
    }
}

/// Deletes expired sessions once, returning how many rows were removed
async fn sweep_once(
    session_repository: &Arc<dyn SessionRepository + Send + Sync>,
) -> Result<u64, AppError> {
    session_repository.cleanup_expired_sessions().await
}
