// Public API - what other modules can use
pub use handlers::{admin_login, login, logout};
pub use service::SessionService;
pub use types::ValidatedSession;

// Internal modules
pub mod admin;
pub mod cleanup_task;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod token;
pub mod types;
