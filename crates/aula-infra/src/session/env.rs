//! Environment variable session provider.
//!
//! Reads the access token from `AULA_ACCESS_TOKEN` and an optional RFC 3339
//! expiry from `AULA_TOKEN_EXPIRES_AT`. This is the highest-priority provider
//! in the chain: a token in the environment overrides the keychain.

use aula_core::auth::{AuthSession, SessionProvider};
use aula_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use secrecy::SecretString;

pub const ACCESS_TOKEN_VAR: &str = "AULA_ACCESS_TOKEN";
pub const TOKEN_EXPIRES_AT_VAR: &str = "AULA_TOKEN_EXPIRES_AT";

/// Read-only session provider backed by environment variables.
pub struct EnvSessionProvider {
    token_var: String,
    expiry_var: String,
}

impl EnvSessionProvider {
    pub fn new() -> Self {
        Self::with_vars(ACCESS_TOKEN_VAR, TOKEN_EXPIRES_AT_VAR)
    }

    /// Read from custom variable names (useful for testing).
    pub fn with_vars(token_var: impl Into<String>, expiry_var: impl Into<String>) -> Self {
        Self {
            token_var: token_var.into(),
            expiry_var: expiry_var.into(),
        }
    }
}

impl Default for EnvSessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for EnvSessionProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, RepositoryError> {
        // Invalid Unicode is treated as absent, same as an unset variable.
        let Ok(token) = std::env::var(&self.token_var) else {
            return Ok(None);
        };
        if token.trim().is_empty() {
            return Ok(None);
        }

        let mut session = AuthSession::new(SecretString::from(token.trim().to_string()));
        if let Ok(raw) = std::env::var(&self.expiry_var) {
            match DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(expires_at) => session = session.with_expiry(expires_at.with_timezone(&Utc)),
                Err(e) => tracing::warn!(
                    var = %self.expiry_var,
                    error = %e,
                    "Ignoring malformed token expiry"
                ),
            }
        }

        Ok(Some(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names so they can run in parallel.

    #[tokio::test]
    async fn test_missing_var_is_no_session() {
        let provider =
            EnvSessionProvider::with_vars("AULA_TEST_MISSING_TOKEN", "AULA_TEST_MISSING_EXP");
        assert!(provider.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reads_token_and_expiry() {
        unsafe {
            std::env::set_var("AULA_TEST_ENV_TOKEN", " tok-123 ");
            std::env::set_var("AULA_TEST_ENV_EXP", "2030-01-01T00:00:00Z");
        }
        let provider = EnvSessionProvider::with_vars("AULA_TEST_ENV_TOKEN", "AULA_TEST_ENV_EXP");

        let session = provider.current_session().await.unwrap().unwrap();
        assert_eq!(session.bearer_token(), "tok-123");
        assert_eq!(
            session.expires_at.map(|e| e.to_rfc3339()),
            Some("2030-01-01T00:00:00+00:00".to_string())
        );
    }

    #[tokio::test]
    async fn test_malformed_expiry_is_ignored() {
        unsafe {
            std::env::set_var("AULA_TEST_BAD_EXP_TOKEN", "tok");
            std::env::set_var("AULA_TEST_BAD_EXP", "tomorrow");
        }
        let provider =
            EnvSessionProvider::with_vars("AULA_TEST_BAD_EXP_TOKEN", "AULA_TEST_BAD_EXP");

        let session = provider.current_session().await.unwrap().unwrap();
        assert!(session.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_blank_token_is_no_session() {
        unsafe {
            std::env::set_var("AULA_TEST_BLANK_TOKEN", "   ");
        }
        let provider =
            EnvSessionProvider::with_vars("AULA_TEST_BLANK_TOKEN", "AULA_TEST_BLANK_EXP");
        assert!(provider.current_session().await.unwrap().is_none());
    }
}
