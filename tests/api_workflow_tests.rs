// End-to-end tests exercising the HTTP surface over in-memory storage

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use soundoff::feedback::repository::InMemoryFeedbackRepository;
use soundoff::feedback::sentiment::LexiconClassifier;
use soundoff::feedback::{list_feedback, submit_feedback};
use soundoff::session::admin::AdminCredentials;
use soundoff::session::repository::InMemorySessionRepository;
use soundoff::session::token::SessionConfig;
use soundoff::session::{admin_login, login, logout};
use soundoff::shared::AppState;
use soundoff::stats::dashboard_stats;
use soundoff::user::register;
use soundoff::user::repository::InMemoryUserRepository;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

fn build_app() -> Router {
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let app_state = AppState::new(
        user_repository.clone(),
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(InMemoryFeedbackRepository::new(user_repository)),
        Arc::new(LexiconClassifier::new()),
        SessionConfig { expiry_hours: 24 },
        AdminCredentials::new("admin", "admin123"),
    );

    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/admin/login", post(admin_login))
        .route("/api/feedback", post(submit_feedback).get(list_feedback))
        .route("/api/admin/stats", get(dashboard_stats))
        .with_state(app_state)
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_user(app: &Router, username: &str, email: &str, password: &str) -> Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            format!(
                r#"{{"username": "{username}", "email": "{email}", "password": "{password}"}}"#
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn login_user(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            format!(r#"{{"username": "{username}", "password": "{password}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["session_token"].as_str().unwrap().to_string()
}

async fn login_admin(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/admin/login",
            r#"{"username": "admin", "password": "admin123"}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["session_token"].as_str().unwrap().to_string()
}

async fn submit(app: &Router, token: &str, rating: i32, comment: &str) -> Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/feedback",
            format!(
                r#"{{"session_token": "{token}", "rating": {rating}, "comment": "{comment}"}}"#
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ============================================================================
// Workflows
// ============================================================================

#[tokio::test]
async fn test_full_feedback_workflow() {
    let app = build_app();

    // Register and log in
    let registered = register_user(&app, "alice", "a@x.com", "password1").await;
    assert_eq!(registered["success"], true);
    assert!(registered["user_id"].is_string());

    let token = login_user(&app, "alice", "password1").await;
    assert!(!token.is_empty());

    // Submit feedback; classification attaches a sentiment label
    let submitted = submit(&app, &token, 5, "great").await;
    assert_eq!(submitted["success"], true);
    assert_eq!(submitted["sentiment"], "positive");

    // Admin sees the record through the rating filter, joined with the
    // submitter's username
    let admin_token = login_admin(&app).await;
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/feedback?session_token={admin_token}&rating=5"
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(response).await;
    let feedback = listing["feedback"].as_array().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0]["username"], "alice");
    assert_eq!(feedback[0]["comment"], "great");
    assert_eq!(feedback[0]["rating"], 5);

    // Dashboard aggregates reflect the single submission
    let response = app
        .oneshot(get_request(&format!(
            "/api/admin/stats?session_token={admin_token}"
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats = body_json(response).await;
    assert_eq!(stats["stats"]["total_users"], 1);
    assert_eq!(stats["stats"]["total_feedback"], 1);
    assert_eq!(stats["stats"]["sentiment_distribution"]["positive"], 1);
    assert_eq!(stats["stats"]["average_rating"], 5.0);
}

#[tokio::test]
async fn test_duplicate_username_conflicts_regardless_of_email() {
    let app = build_app();
    register_user(&app, "alice", "a@x.com", "password1").await;

    let response = app
        .oneshot(post_json(
            "/api/auth/register",
            r#"{"username": "alice", "email": "b@y.com", "password": "password2"}"#.to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn test_login_with_bad_credentials_is_unauthorized() {
    let app = build_app();
    register_user(&app, "alice", "a@x.com", "password1").await;

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            r#"{"username": "alice", "password": "not-the-password"}"#.to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_logout_revokes_the_session() {
    let app = build_app();
    register_user(&app, "alice", "a@x.com", "password1").await;
    let token = login_user(&app, "alice", "password1").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/logout",
            format!(r#"{{"session_token": "{token}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The revoked token no longer authenticates submissions
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/feedback",
            format!(r#"{{"session_token": "{token}", "rating": 5, "comment": "great"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A second logout of the same token reports failure
    let response = app
        .oneshot(post_json(
            "/api/auth/logout",
            format!(r#"{{"session_token": "{token}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid session token");
}

#[tokio::test]
async fn test_admin_login_rejects_wrong_credentials() {
    let app = build_app();

    let response = app
        .oneshot(post_json(
            "/api/auth/admin/login",
            r#"{"username": "admin", "password": "guessing"}"#.to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_sessions_cannot_reach_admin_endpoints() {
    let app = build_app();
    register_user(&app, "alice", "a@x.com", "password1").await;
    let token = login_user(&app, "alice", "password1").await;

    let listing = app
        .clone()
        .oneshot(get_request(&format!("/api/feedback?session_token={token}")))
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::FORBIDDEN);

    let stats = app
        .oneshot(get_request(&format!(
            "/api/admin/stats?session_token={token}"
        )))
        .await
        .unwrap();
    assert_eq!(stats.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_sessions_cannot_submit_feedback() {
    let app = build_app();
    let admin_token = login_admin(&app).await;

    let response = app
        .oneshot(post_json(
            "/api/feedback",
            format!(r#"{{"session_token": "{admin_token}", "rating": 5, "comment": "great"}}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Admins cannot submit feedback");
}

#[tokio::test]
async fn test_submission_validation_combines_all_problems() {
    let app = build_app();
    register_user(&app, "alice", "a@x.com", "password1").await;
    let token = login_user(&app, "alice", "password1").await;

    let response = app
        .oneshot(post_json(
            "/api/feedback",
            format!(r#"{{"session_token": "{token}", "rating": 0, "comment": "   "}}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Rating must be between 1 and 5; Comment cannot be empty"
    );
}

#[tokio::test]
async fn test_admin_filters_by_sentiment_and_search() {
    let app = build_app();

    register_user(&app, "alice", "a@x.com", "password1").await;
    register_user(&app, "bob", "b@x.com", "password1").await;
    let alice = login_user(&app, "alice", "password1").await;
    let bob = login_user(&app, "bob", "password1").await;

    let first = submit(&app, &alice, 5, "great product").await;
    assert_eq!(first["sentiment"], "positive");
    let second = submit(&app, &bob, 1, "terrible mess").await;
    assert_eq!(second["sentiment"], "negative");

    let admin_token = login_admin(&app).await;

    // Sentiment filter narrows to bob's complaint
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/feedback?session_token={admin_token}&sentiment=negative"
        )))
        .await
        .unwrap();
    let listing = body_json(response).await;
    let feedback = listing["feedback"].as_array().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0]["username"], "bob");

    // Search matches against the username as well as the comment
    let response = app
        .oneshot(get_request(&format!(
            "/api/feedback?session_token={admin_token}&search=alice"
        )))
        .await
        .unwrap();
    let listing = body_json(response).await;
    let feedback = listing["feedback"].as_array().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0]["comment"], "great product");
}

#[tokio::test]
async fn test_listing_returns_all_records_newest_first_without_filters() {
    let app = build_app();
    register_user(&app, "alice", "a@x.com", "password1").await;
    let token = login_user(&app, "alice", "password1").await;

    for comment in ["first note", "second note", "third note"] {
        submit(&app, &token, 3, comment).await;
        // Distinct creation timestamps keep the ordering deterministic
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let admin_token = login_admin(&app).await;
    let response = app
        .oneshot(get_request(&format!(
            "/api/feedback?session_token={admin_token}"
        )))
        .await
        .unwrap();

    let listing = body_json(response).await;
    let feedback = listing["feedback"].as_array().unwrap();
    assert_eq!(feedback.len(), 3);
    assert_eq!(feedback[0]["comment"], "third note");
    assert_eq!(feedback[2]["comment"], "first note");
}

#[tokio::test]
async fn test_stats_on_empty_store() {
    let app = build_app();
    let admin_token = login_admin(&app).await;

    let response = app
        .oneshot(get_request(&format!(
            "/api/admin/stats?session_token={admin_token}"
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats = body_json(response).await;
    assert_eq!(stats["stats"]["total_users"], 0);
    assert_eq!(stats["stats"]["total_feedback"], 0);
    assert_eq!(stats["stats"]["average_rating"], 0.0);
    assert_eq!(stats["stats"]["sentiment_distribution"]["positive"], 0);
    assert_eq!(stats["stats"]["sentiment_distribution"]["negative"], 0);
    assert_eq!(stats["stats"]["sentiment_distribution"]["neutral"], 0);
}
