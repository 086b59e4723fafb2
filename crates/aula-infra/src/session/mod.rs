//! Session providers and the resolution chain.
//!
//! - `env`: `AULA_ACCESS_TOKEN` (read-only, highest priority)
//! - `keychain`: OS keychain, written by `aula auth set-token`
//! - `SessionChain`: tries each provider in order, first session wins

pub mod env;
pub mod keychain;

use aula_core::auth::{AuthSession, SessionProvider};
use aula_types::error::RepositoryError;
use tracing::{debug, warn};

use self::env::EnvSessionProvider;
use self::keychain::KeychainSessionProvider;

/// Environment first, then (if available) the OS keychain.
///
/// A keychain failure is logged and treated as "no session" so a headless
/// machine with only the environment variable still works.
pub struct SessionChain {
    env: Option<EnvSessionProvider>,
    keychain: Option<KeychainSessionProvider>,
}

impl SessionChain {
    pub fn new(env: Option<EnvSessionProvider>, keychain: Option<KeychainSessionProvider>) -> Self {
        Self { env, keychain }
    }

    /// The default chain: environment, then keychain.
    pub fn standard() -> Self {
        Self::new(
            Some(EnvSessionProvider::new()),
            Some(KeychainSessionProvider::new()),
        )
    }
}

impl SessionProvider for SessionChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, RepositoryError> {
        if let Some(env) = &self.env {
            if let Some(session) = env.current_session().await? {
                debug!(provider = env.name(), "Session resolved");
                return Ok(Some(session));
            }
        }

        if let Some(keychain) = &self.keychain {
            match keychain.current_session().await {
                Ok(Some(session)) => {
                    debug!(provider = keychain.name(), "Session resolved");
                    return Ok(Some(session));
                }
                Ok(None) => {}
                Err(e) => warn!(provider = keychain.name(), error = %e, "Session provider failed"),
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_env_wins() {
        unsafe { std::env::set_var("AULA_TEST_CHAIN_TOKEN", "from-env") };
        let chain = SessionChain::new(
            Some(EnvSessionProvider::with_vars("AULA_TEST_CHAIN_TOKEN", "AULA_TEST_CHAIN_EXP")),
            None,
        );
        let session = chain.current_session().await.unwrap().unwrap();
        assert_eq!(session.bearer_token(), "from-env");
    }

    #[tokio::test]
    async fn test_empty_chain_has_no_session() {
        let chain = SessionChain::new(None, None);
        assert!(chain.current_session().await.unwrap().is_none());
    }
}
