// Public API - what other modules can use
pub use handlers::{list_feedback, submit_feedback};
pub use models::Sentiment;
pub use service::FeedbackService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod sentiment;
pub mod service;
pub mod types;
