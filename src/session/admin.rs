use subtle::ConstantTimeEq;

/// Static admin credentials, configured through the environment.
///
/// These gate admin login only; no users-table row exists for the admin.
/// Comparison is constant time so timing does not leak how much of a guess
/// matched.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Reads ADMIN_USERNAME/ADMIN_PASSWORD, falling back to development
    /// defaults when unset
    pub fn from_env() -> Self {
        Self {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
        }
    }

    /// Checks a username/password pair against the configured credentials
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok: bool = username
            .as_bytes()
            .ct_eq(self.username.as_bytes())
            .into();
        let password_ok: bool = password
            .as_bytes()
            .ct_eq(self.password.as_bytes())
            .into();
        username_ok & password_ok
    }
}
