//! GenerationClient trait definition.
//!
//! The port through which the orchestrator reaches a remote generation
//! function. Implementations live in aula-infra (`HttpGenerationClient`).

use std::future::Future;

use thiserror::Error;

use aula_types::generation::GenerationRequest;

use crate::auth::AuthSession;

/// Failure of the call itself, before any payload could be inspected.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The service rejected the credential.
    #[error("unauthorized")]
    Unauthorized,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Calls one of the remote generation functions.
///
/// Returns the decoded JSON payload for both success and in-band failure
/// bodies (`{error, ...}`); classification happens in the orchestrator.
pub trait GenerationClient: Send + Sync {
    /// Human-readable client name, for logs.
    fn name(&self) -> &str;

    fn invoke(
        &self,
        endpoint: &str,
        request: &GenerationRequest,
        session: &AuthSession,
    ) -> impl Future<Output = Result<serde_json::Value, InvocationError>> + Send;
}
