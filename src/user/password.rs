use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use tracing::debug;

use crate::shared::AppError;

/// Hashes a password with argon2id and a fresh random salt.
/// Returns the PHC string form suitable for storage.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            debug!(error = %e, "Failed to hash password");
            AppError::Internal
        })
}

/// Verifies a password against a stored PHC hash string.
/// A malformed stored hash reads as a mismatch rather than an error.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            debug!(error = %e, "Stored password hash failed to parse");
            false
        }
    }
}
