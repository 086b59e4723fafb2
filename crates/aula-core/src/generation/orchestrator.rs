//! GenerationOrchestrator -- one submission from wizard state to result.
//!
//! Resolves the session, builds the request, calls the endpoint selected by
//! the content type and classifies the outcome. Every failure comes back as
//! a `GenerationResult::Failure`; nothing here returns `Err` or retries.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tracing::{Instrument, debug, info, info_span, warn};

use aula_types::generation::{GenerationFailure, GenerationResult};
use aula_types::wizard::WizardState;

use crate::auth::{AuthSession, SessionProvider};

use super::classify::classify_outcome;
use super::client::GenerationClient;
use super::request::build_request;

pub struct GenerationOrchestrator<C, P> {
    client: C,
    sessions: P,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<C: GenerationClient, P: SessionProvider> GenerationOrchestrator<C, P> {
    pub fn new(client: C, sessions: P) -> Self {
        Self {
            client,
            sessions,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn sessions(&self) -> &P {
        &self.sessions
    }

    /// Whether a `generate` call is currently running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit `state` to its generation endpoint.
    ///
    /// A second call while one is running returns `InFlight` without
    /// touching the remote service.
    pub async fn generate(&self, state: &WizardState) -> GenerationResult {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Generation already in flight, rejecting");
            return GenerationFailure::InFlight.into();
        };

        let Some(session) = self.resolve_session().await else {
            info!(content_type = %state.content_type, "No valid session, not calling remote");
            return GenerationFailure::SessionExpired.into();
        };

        let request = build_request(state);
        let endpoint = state.content_type.endpoint();

        let span = info_span!(
            "generate",
            content_type = %state.content_type,
            endpoint,
            client = self.client.name(),
        );

        let outcome = self
            .client
            .invoke(endpoint, &request, &session)
            .instrument(span)
            .await;

        let result = classify_outcome(outcome);
        match result.failure() {
            None => info!(content_type = %state.content_type, "Generation succeeded"),
            Some(failure) => info!(
                content_type = %state.content_type,
                kind = %failure.kind(),
                "Generation failed"
            ),
        }
        result
    }

    async fn resolve_session(&self) -> Option<AuthSession> {
        match self.sessions.current_session().await {
            Ok(Some(session)) if session.is_valid_at(Utc::now()) => Some(session),
            Ok(Some(_)) => {
                debug!(provider = self.sessions.name(), "Session expired");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(provider = self.sessions.name(), error = %e, "Failed to read session");
                None
            }
        }
    }
}
