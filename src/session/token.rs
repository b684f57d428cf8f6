use rand::{distr::Alphanumeric, Rng};

/// Length of generated session tokens. 43 alphanumeric characters carry
/// slightly over 255 bits of entropy, matching a 32-byte URL-safe token.
pub const TOKEN_LENGTH: usize = 43;

/// Generates an opaque URL-safe session token from the thread-local CSPRNG
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Configuration for session lifetimes
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub expiry_hours: i64,
}

impl SessionConfig {
    pub fn new() -> Self {
        // Allow configuring expiry via env var, default to 24 hours
        let expiry_hours = std::env::var("SESSION_EXPIRY_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(24);

        Self { expiry_hours }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
