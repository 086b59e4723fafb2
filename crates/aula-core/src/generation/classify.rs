//! Ordered classification of a generation call into a `GenerationResult`.
//!
//! Order matters: the first matching rule wins.
//!
//! 1. `Unauthorized` -> `SessionExpired`
//! 2. any other call failure -> `RemoteError`
//! 3. payload `error` with `limit_type` -> `QuotaExceeded`
//! 4. payload `error` alone -> `GenerationError`
//! 5. missing or blank `content` -> `EmptyResult`
//! 6. otherwise -> `Success`

use serde_json::Value;

use aula_types::generation::{GenerationFailure, GenerationResult};

use super::client::InvocationError;

pub fn classify_outcome(outcome: Result<Value, InvocationError>) -> GenerationResult {
    match outcome {
        Err(InvocationError::Unauthorized) => GenerationFailure::SessionExpired.into(),
        Err(e) => GenerationFailure::RemoteError {
            message: e.to_string(),
        }
        .into(),
        Ok(payload) => classify_payload(&payload),
    }
}

pub fn classify_payload(payload: &Value) -> GenerationResult {
    if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
        let message = error_message(error);

        if let Some(limit_type) = payload.get("limit_type").and_then(Value::as_str) {
            return GenerationFailure::QuotaExceeded {
                message,
                limit_type: limit_type.to_string(),
                limit: payload.get("limit").and_then(as_limit),
                tier: payload
                    .get("tier")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }
            .into();
        }

        return GenerationFailure::GenerationError { message }.into();
    }

    match payload.get("content").and_then(Value::as_str) {
        Some(content) if !content.trim().is_empty() => GenerationResult::Success {
            content: content.to_string(),
        },
        _ => GenerationFailure::EmptyResult.into(),
    }
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| error.to_string(), str::to_string),
        other => other.to_string(),
    }
}

/// Accepts `10` or `"10"`.
fn as_limit(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}
