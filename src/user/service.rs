use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{models::UserModel, password, repository::UserRepository};
use crate::shared::AppError;

/// Simple local@domain.tld shape check, not full RFC 5322
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

const MIN_PASSWORD_LENGTH: usize = 8;

/// Service for user registration and credential verification
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Registers a new user after validating the supplied fields.
    ///
    /// Username and email uniqueness are checked as two independent queries,
    /// username first, so the error names the field that collided.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Uuid, AppError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Missing required fields: username, email, and password are required".to_string(),
            ));
        }

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(
                "Password must be at least 8 characters long".to_string(),
            ));
        }

        if !EMAIL_PATTERN.is_match(email) {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }

        if self
            .repository
            .get_user_by_username(username)
            .await?
            .is_some()
        {
            warn!(username = %username, "Registration rejected: username taken");
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        if self.repository.get_user_by_email(email).await?.is_some() {
            warn!("Registration rejected: email taken");
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = password::hash_password(password)?;
        let user = UserModel::new(username.to_string(), email.to_string(), password_hash);
        self.repository.create_user(&user).await?;

        info!(user_id = %user.id, username = %user.username, "User registered successfully");
        Ok(user.id)
    }

    /// Verifies a username/password pair, returning the user's id.
    ///
    /// Fails with the same message whether the username is unknown or the
    /// password does not match, so callers cannot probe for usernames.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Uuid, AppError> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        if username.is_empty() || password.is_empty() {
            return Err(invalid());
        }

        let user = match self.repository.get_user_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!(username = %username, "Login rejected: unknown username");
                return Err(invalid());
            }
        };

        if !password::verify_password(password, &user.password_hash) {
            warn!(username = %username, "Login rejected: password mismatch");
            return Err(invalid());
        }

        info!(user_id = %user.id, username = %username, "Credentials verified");
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::repository::InMemoryUserRepository;
    use rstest::rstest;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    #[tokio::test]
    async fn test_register_success() {
        let service = service();
        let user_id = service
            .register("alice", "alice@example.com", "password1")
            .await
            .unwrap();
        assert!(!user_id.is_nil());
    }

    #[rstest]
    #[case("", "alice@example.com", "password1")]
    #[case("alice", "", "password1")]
    #[case("alice", "alice@example.com", "")]
    #[tokio::test]
    async fn test_register_missing_fields(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let result = service().register(username, email, password).await;
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("Missing required fields")),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let result = service().register("alice", "alice@example.com", "short").await;
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("at least 8 characters")),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[rstest]
    #[case("plainaddress")]
    #[case("missing@tld")]
    #[case("@no-local.com")]
    #[case("spaces in@address.com")]
    #[tokio::test]
    async fn test_register_invalid_email(#[case] email: &str) {
        let result = service().register("alice", email, "password1").await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "Invalid email format"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_conflicts_regardless_of_email() {
        let service = service();
        service
            .register("alice", "alice@example.com", "password1")
            .await
            .unwrap();

        let result = service
            .register("alice", "different@example.com", "password1")
            .await;
        assert!(
            matches!(result, Err(AppError::Conflict(msg)) if msg == "Username already exists")
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let service = service();
        service
            .register("alice", "alice@example.com", "password1")
            .await
            .unwrap();

        let result = service
            .register("bob", "alice@example.com", "password1")
            .await;
        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == "Email already exists"));
    }

    #[tokio::test]
    async fn test_verify_credentials_success() {
        let service = service();
        let user_id = service
            .register("alice", "alice@example.com", "password1")
            .await
            .unwrap();

        let verified = service
            .verify_credentials("alice", "password1")
            .await
            .unwrap();
        assert_eq!(verified, user_id);
    }

    #[tokio::test]
    async fn test_verify_credentials_uniform_failure_message() {
        let service = service();
        service
            .register("alice", "alice@example.com", "password1")
            .await
            .unwrap();

        // Unknown username and wrong password must be indistinguishable
        let unknown = service.verify_credentials("bob", "password1").await;
        let wrong = service.verify_credentials("alice", "wrong-password").await;

        let unknown_msg = match unknown {
            Err(AppError::Unauthorized(msg)) => msg,
            other => panic!("expected unauthorized, got {:?}", other.map(|_| ())),
        };
        let wrong_msg = match wrong {
            Err(AppError::Unauthorized(msg)) => msg,
            other => panic!("expected unauthorized, got {:?}", other.map(|_| ())),
        };
        assert_eq!(unknown_msg, wrong_msg);
        assert_eq!(unknown_msg, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_verify_credentials_empty_fields() {
        let result = service().verify_credentials("", "").await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
