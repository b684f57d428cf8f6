use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soundoff::feedback::repository::{
    FeedbackRepository, InMemoryFeedbackRepository, PostgresFeedbackRepository,
};
use soundoff::feedback::sentiment::LexiconClassifier;
use soundoff::feedback::{list_feedback, submit_feedback};
use soundoff::session::admin::AdminCredentials;
use soundoff::session::cleanup_task::{start_session_sweep, SweepConfig};
use soundoff::session::repository::{
    InMemorySessionRepository, PostgresSessionRepository, SessionRepository,
};
use soundoff::session::token::SessionConfig;
use soundoff::session::{admin_login, login, logout};
use soundoff::shared::AppState;
use soundoff::stats::dashboard_stats;
use soundoff::user::register;
use soundoff::user::repository::{
    InMemoryUserRepository, PostgresUserRepository, UserRepository,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundoff=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting feedback collection server");

    // Select storage: PostgreSQL when DATABASE_URL is set, in-memory otherwise
    let (user_repository, session_repository, feedback_repository): (
        Arc<dyn UserRepository + Send + Sync>,
        Arc<dyn SessionRepository + Send + Sync>,
        Arc<dyn FeedbackRepository + Send + Sync>,
    ) = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("Failed to connect to database");
            info!("Using PostgreSQL storage");
            (
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresSessionRepository::new(pool.clone())),
                Arc::new(PostgresFeedbackRepository::new(pool)),
            )
        }
        Err(_) => {
            info!("DATABASE_URL not set, using in-memory storage");
            let user_repository = Arc::new(InMemoryUserRepository::new());
            (
                user_repository.clone(),
                Arc::new(InMemorySessionRepository::new()),
                Arc::new(InMemoryFeedbackRepository::new(user_repository)),
            )
        }
    };

    let app_state = AppState::new(
        user_repository,
        session_repository.clone(),
        feedback_repository,
        Arc::new(LexiconClassifier::new()),
        SessionConfig::new(),
        AdminCredentials::from_env(),
    );

    // Background sweep reclaims expired session rows; validation already
    // treats them as invalid
    tokio::spawn(start_session_sweep(
        session_repository,
        SweepConfig::default(),
    ));

    // CORS stays permissive for the browser frontend
    let app = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/admin/login", post(admin_login))
        .route("/api/feedback", post(submit_feedback).get(list_feedback))
        .route("/api/admin/stats", get(dashboard_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
