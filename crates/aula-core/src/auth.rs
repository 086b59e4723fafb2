//! Session credential resolution.
//!
//! The wizard never signs anyone in; it only asks a [`SessionProvider`] for
//! the credential the user already holds and checks that it has not expired.

use std::fmt;
use std::future::Future;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use aula_types::error::RepositoryError;

/// An access token plus what is known about its lifetime.
///
/// The token is wrapped in [`SecretString`] and never appears in `Debug`
/// output or logs.
#[derive(Clone)]
pub struct AuthSession {
    access_token: SecretString,
    pub user_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    pub fn new(access_token: SecretString) -> Self {
        Self {
            access_token,
            user_id: None,
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// The raw bearer token, for building request headers only.
    pub fn bearer_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Usable at `now`: non-empty token and not past its expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.expose_secret().trim().is_empty()
            && self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of the current user's session.
///
/// Uses RPITIT, consistent with all async traits in this project.
/// Implementations live in aula-infra (environment, OS keychain).
pub trait SessionProvider: Send + Sync {
    /// Human-readable provider name, for logs.
    fn name(&self) -> &str;

    /// The current session, or `None` if the user is not signed in.
    fn current_session(
        &self,
    ) -> impl Future<Output = Result<Option<AuthSession>, RepositoryError>> + Send;
}
