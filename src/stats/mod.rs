// Public API - what other modules can use
pub use handlers::dashboard_stats;
pub use models::{DashboardStats, SentimentDistribution, StatsResponse};
pub use service::StatsService;

// Internal modules
mod handlers;
pub mod models;
pub mod service;
