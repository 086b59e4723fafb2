//! WizardSession -- one open wizard: store, navigation and draft autosave.
//!
//! The session is the only place that knows about all three. Opening it
//! restores or creates the state and starts the autosave task; closing or
//! dropping it cancels that task (a pending write is discarded, use
//! [`flush`](WizardSession::flush) first to keep it).
//!
//! After a successful submission the session is `Submitted`: the draft is
//! gone and every mutating call returns `WizardError::AlreadySubmitted`
//! until [`reset_wizard`](WizardSession::reset_wizard).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use aula_types::error::WizardError;
use aula_types::generation::GenerationResult;
use aula_types::wizard::{ClassSummary, ContentType, WizardPatch, WizardState, WizardStep};

use crate::auth::SessionProvider;
use crate::draft::autosave::{AutosaveHandle, spawn_autosave};
use crate::draft::persistence::DraftPersistenceManager;
use crate::draft::storage::DraftStorage;
use crate::generation::client::GenerationClient;
use crate::generation::orchestrator::GenerationOrchestrator;

use super::navigation::{NavigationController, NextOutcome};
use super::store::WizardStore;
use super::validator::{is_step_complete, validate_step};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Editing,
    Submitted,
}

/// Completed steps, for a progress indicator only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u8,
    pub total: u8,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (u16::from(self.completed) * 100 / u16::from(self.total)) as u8
    }
}

pub struct WizardSession<S: DraftStorage + 'static> {
    id: Uuid,
    store: WizardStore,
    navigation: NavigationController,
    drafts: Arc<DraftPersistenceManager<S>>,
    autosave: Mutex<Option<AutosaveHandle>>,
    submitted: AtomicBool,
    restored_from: Option<DateTime<Utc>>,
}

impl<S: DraftStorage + 'static> WizardSession<S> {
    /// Open a wizard for `content_type`.
    ///
    /// A live draft is restored as-is; otherwise the defaults are merged with
    /// `prefill`. Must be called inside a Tokio runtime.
    pub async fn open(
        drafts: Arc<DraftPersistenceManager<S>>,
        content_type: ContentType,
        prefill: &WizardPatch,
    ) -> Self {
        let restored = drafts.restore(content_type, prefill).await;
        let store = WizardStore::new(restored.state);
        let autosave = spawn_autosave(Arc::clone(&drafts), store.clone());
        let id = Uuid::now_v7();

        debug!(
            session_id = %id,
            %content_type,
            restored = restored.restored_from.is_some(),
            "Wizard session opened"
        );

        Self {
            id,
            navigation: NavigationController::new(store.clone()),
            store,
            drafts,
            autosave: Mutex::new(Some(autosave)),
            submitted: AtomicBool::new(false),
            restored_from: restored.restored_from,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn store(&self) -> &WizardStore {
        &self.store
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn state(&self) -> WizardState {
        self.store.snapshot()
    }

    /// When the restored draft was saved, if the session resumed one.
    pub fn restored_from(&self) -> Option<DateTime<Utc>> {
        self.restored_from
    }

    pub fn phase(&self) -> SessionPhase {
        if self.submitted.load(Ordering::Acquire) {
            SessionPhase::Submitted
        } else {
            SessionPhase::Editing
        }
    }

    pub fn progress(&self) -> Progress {
        let completed = self.store.read(|state| {
            WizardStep::all()
                .iter()
                .filter(|step| is_step_complete(**step, state))
                .count()
        });
        Progress {
            completed: completed as u8,
            total: WizardStep::total(),
        }
    }

    pub fn update_state(&self, patch: WizardPatch) -> Result<WizardState, WizardError> {
        self.ensure_editing()?;
        Ok(self.store.update_state(patch))
    }

    /// Switch the content type, keeping the answers. Later saves go to the
    /// new type's draft slot.
    pub fn set_content_type(&self, content_type: ContentType) -> Result<WizardState, WizardError> {
        self.ensure_editing()?;
        Ok(self.store.set_content_type(content_type))
    }

    /// Link one of the user's classes; grade, subject and class size
    /// follow it.
    pub fn link_class(&self, class: &ClassSummary) -> Result<WizardState, WizardError> {
        self.ensure_editing()?;
        Ok(self.store.link_class(class))
    }

    pub fn unlink_class(&self) -> Result<WizardState, WizardError> {
        self.ensure_editing()?;
        Ok(self.store.unlink_class())
    }

    pub fn next(&self) -> Result<NextOutcome, WizardError> {
        self.ensure_editing()?;
        Ok(self.navigation.handle_next())
    }

    pub fn back(&self) -> Result<WizardStep, WizardError> {
        self.ensure_editing()?;
        Ok(self.navigation.handle_back())
    }

    pub fn go_to_step(&self, n: i64) -> Result<WizardStep, WizardError> {
        self.ensure_editing()?;
        Ok(self.navigation.go_to_step(n))
    }

    /// Back to defaults for the current content type, with the draft removed.
    /// Also leaves the `Submitted` phase.
    pub async fn reset_wizard(&self) -> WizardState {
        // Stop autosave first so an in-progress write cannot recreate the draft.
        self.stop_autosave().await;

        let state = self.store.reset();
        self.drafts.discard(state.content_type).await;
        self.submitted.store(false, Ordering::Release);

        let handle = spawn_autosave(Arc::clone(&self.drafts), self.store.clone());
        *self.autosave.lock().expect("autosave lock poisoned") = Some(handle);

        debug!(session_id = %self.id, content_type = %state.content_type, "Wizard reset");
        state
    }

    /// Write the current state now instead of waiting for the debounce.
    pub async fn flush(&self) -> Result<(), WizardError> {
        if self.phase() == SessionPhase::Submitted {
            return Ok(());
        }
        let snapshot = self.store.snapshot();
        self.drafts.try_save(&snapshot).await?;
        Ok(())
    }

    /// Submit from the terminal step.
    ///
    /// Returns `Err` only when the request cannot be sent at all (wrong step,
    /// missing answers, already submitted). Remote outcomes, including
    /// failures, come back as `Ok(GenerationResult)`; on failure the state is
    /// kept and the user stays on the terminal step.
    pub async fn submit<C, P>(
        &self,
        orchestrator: &GenerationOrchestrator<C, P>,
    ) -> Result<GenerationResult, WizardError>
    where
        C: GenerationClient,
        P: SessionProvider,
    {
        self.ensure_editing()?;

        let state = self.store.snapshot();
        if !state.current_step.is_terminal() {
            return Err(WizardError::NotAtTerminalStep {
                current: state.current_step,
            });
        }
        let validation = validate_step(state.current_step, &state);
        if !validation.is_valid {
            return Err(WizardError::Blocked {
                step: state.current_step,
                errors: validation.errors,
            });
        }

        let result = orchestrator.generate(&state).await;

        if result.is_success() {
            self.submitted.store(true, Ordering::Release);
            self.stop_autosave().await;
            self.drafts.discard(state.content_type).await;
            info!(session_id = %self.id, content_type = %state.content_type, "Wizard submitted");
        }

        Ok(result)
    }

    /// Stop autosave and wait for it. A pending write is discarded.
    pub async fn close(self) {
        self.stop_autosave().await;
        debug!(session_id = %self.id, "Wizard session closed");
    }

    fn ensure_editing(&self) -> Result<(), WizardError> {
        match self.phase() {
            SessionPhase::Editing => Ok(()),
            SessionPhase::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    async fn stop_autosave(&self) {
        let handle = self.autosave.lock().expect("autosave lock poisoned").take();
        if let Some(handle) = handle {
            handle.shutdown().await;
        }
    }
}
