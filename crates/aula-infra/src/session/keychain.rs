//! OS keychain session store.
//!
//! Uses the `keyring` crate to keep the user's access token in:
//! - macOS Keychain
//! - Linux Secret Service (GNOME Keyring, KDE Wallet)
//! - Windows Credential Manager
//!
//! The entry holds a small JSON record so an expiry can travel with the
//! token. A bare token (written by another tool) is accepted as well.

use aula_core::auth::{AuthSession, SessionProvider};
use aula_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

const DEFAULT_SERVICE: &str = "aula";
const SESSION_ACCOUNT: &str = "session";

#[derive(Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

/// Session provider backed by the OS keychain. Also the write side used by
/// `aula auth set-token` / `aula auth clear`.
pub struct KeychainSessionProvider {
    service_name: String,
}

impl KeychainSessionProvider {
    /// Create a provider with the default service name "aula".
    pub fn new() -> Self {
        Self::with_service(DEFAULT_SERVICE)
    }

    /// Create a provider with a custom service name (useful for testing).
    pub fn with_service(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, RepositoryError> {
        keyring::Entry::new(&self.service_name, SESSION_ACCOUNT)
            .map_err(|e| RepositoryError::Query(format!("keychain entry error: {e}")))
    }

    /// Store `token`, replacing any previous session.
    pub fn store_token(
        &self,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let record = StoredSession {
            access_token: token.trim().to_string(),
            user_id: None,
            expires_at,
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| RepositoryError::Query(format!("failed to encode session: {e}")))?;

        self.entry()?
            .set_password(&json)
            .map_err(|e| RepositoryError::Query(format!("keychain set error: {e}")))
    }

    /// Remove the stored session. Returns `NotFound` if there was none.
    pub fn clear(&self) -> Result<(), RepositoryError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Err(RepositoryError::NotFound),
            Err(e) => Err(RepositoryError::Query(format!("keychain delete error: {e}"))),
        }
    }
}

impl Default for KeychainSessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a keychain value: a JSON record, or a bare token.
fn decode(raw: &str) -> Option<AuthSession> {
    let record = serde_json::from_str::<StoredSession>(raw).unwrap_or_else(|_| StoredSession {
        access_token: raw.trim().to_string(),
        user_id: None,
        expires_at: None,
    });

    if record.access_token.trim().is_empty() {
        return None;
    }

    let mut session = AuthSession::new(SecretString::from(record.access_token));
    if let Some(user_id) = record.user_id {
        session = session.with_user_id(user_id);
    }
    if let Some(expires_at) = record.expires_at {
        session = session.with_expiry(expires_at);
    }
    Some(session)
}

impl SessionProvider for KeychainSessionProvider {
    fn name(&self) -> &str {
        "keychain"
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, RepositoryError> {
        match self.entry()?.get_password() {
            Ok(raw) => Ok(decode(&raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(RepositoryError::Query(format!("keychain get error: {e}"))),
        }
    }
}
