//! HTTP generation client.
//!
//! Posts the request body to `{base}/functions/v1/{endpoint}`. In-band
//! failures (`{error, ...}` bodies, including the 402 quota reply) are
//! returned as payloads so the orchestrator can classify them; only
//! transport problems, 401 and non-JSON error bodies become
//! `InvocationError`s.

use aula_core::auth::AuthSession;
use aula_core::generation::client::{GenerationClient, InvocationError};
use aula_types::generation::GenerationRequest;
use serde_json::Value;
use tracing::debug;

use super::RemoteEndpoint;

pub struct HttpGenerationClient {
    endpoint: RemoteEndpoint,
}

impl HttpGenerationClient {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

impl GenerationClient for HttpGenerationClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn invoke(
        &self,
        endpoint: &str,
        request: &GenerationRequest,
        session: &AuthSession,
    ) -> Result<Value, InvocationError> {
        let url = self.endpoint.function_url(endpoint);

        let response = self
            .endpoint
            .post(&url, session)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InvocationError::Transport(format!("request timed out: {e}"))
                } else {
                    InvocationError::Transport(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "Generation function responded");

        if status.as_u16() == 401 {
            return Err(InvocationError::Unauthorized);
        }

        let body = response
            .text()
            .await
            .map_err(|e| InvocationError::Transport(format!("failed to read response: {e}")))?;

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|e| InvocationError::Decode(format!("failed to parse response: {e}")));
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(payload) if payload.get("error").is_some() => Ok(payload),
            _ => Err(InvocationError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }
}
