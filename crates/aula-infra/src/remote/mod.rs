//! HTTP adapters for the hosted backend.
//!
//! - `generation`: `GenerationClient` over the three generation functions
//! - `classes`: `ClassDirectory` over the classes table
//! - `skills`: `SkillSuggester` over the skill suggestion function
//!
//! All three share one [`RemoteEndpoint`]: base URL, public API key and the
//! request timeout from config.

pub mod classes;
pub mod generation;
pub mod skills;

use std::time::Duration;

use aula_core::auth::AuthSession;
use aula_types::config::GlobalConfig;
use aula_types::error::RepositoryError;
use secrecy::{ExposeSecret, SecretString};

/// Minimum accepted request timeout (safety floor for misconfiguration).
const MIN_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Where the backend lives and how to authenticate against it.
#[derive(Clone)]
pub struct RemoteEndpoint {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl RemoteEndpoint {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &GlobalConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.request_timeout_secs.max(MIN_REQUEST_TIMEOUT_SECS));
        Self::new(
            config.api_base_url.clone(),
            config.api_key.clone().map(SecretString::from),
            timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a serverless function: `{base}/functions/v1/{name}`.
    pub fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{name}", self.base_url)
    }

    /// URL of a REST table resource: `{base}/rest/v1/{table}`.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Attach the user's bearer token and, when configured, the public key.
    fn authorize(
        &self,
        builder: reqwest::RequestBuilder,
        session: &AuthSession,
    ) -> reqwest::RequestBuilder {
        let builder = builder.bearer_auth(session.bearer_token());
        match &self.api_key {
            Some(key) => builder.header("apikey", key.expose_secret()),
            None => builder,
        }
    }

    pub(crate) fn get(&self, url: &str, session: &AuthSession) -> reqwest::RequestBuilder {
        self.authorize(self.client.get(url), session)
    }

    pub(crate) fn post(&self, url: &str, session: &AuthSession) -> reqwest::RequestBuilder {
        self.authorize(self.client.post(url), session)
    }
}

/// Map a non-2xx directory response to a repository error.
fn status_error(status: reqwest::StatusCode, body: &str) -> RepositoryError {
    match status.as_u16() {
        401 | 403 => RepositoryError::Connection,
        404 => RepositoryError::NotFound,
        _ => RepositoryError::Query(format!("HTTP {status}: {body}")),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_trim_trailing_slash() {
        let endpoint =
            RemoteEndpoint::new("https://x.example.co/", None, Duration::from_secs(10)).unwrap();
        assert_eq!(
            endpoint.function_url("generate-activity"),
            "https://x.example.co/functions/v1/generate-activity"
        );
        assert_eq!(endpoint.table_url("classes"), "https://x.example.co/rest/v1/classes");
    }

    #[test]
    fn test_from_config_accepts_zero_timeout() {
        let config = GlobalConfig {
            request_timeout_secs: 0,
            ..GlobalConfig::default()
        };
        let endpoint = RemoteEndpoint::from_config(&config).unwrap();
        assert_eq!(endpoint.base_url(), "http://localhost:54321");
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(reqwest::StatusCode::NOT_FOUND, ""),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            status_error(reqwest::StatusCode::UNAUTHORIZED, ""),
            RepositoryError::Connection
        ));
        assert!(matches!(
            status_error(reqwest::StatusCode::BAD_GATEWAY, "upstream"),
            RepositoryError::Query(msg) if msg.contains("upstream")
        ));
    }
}
