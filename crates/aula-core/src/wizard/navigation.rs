//! NavigationController -- gated movement between wizard steps.
//!
//! Forward moves require the current step to validate. Backward moves and
//! direct jumps are never gated; jumps let the user fix earlier answers
//! from the review screen, and the terminal gate re-checks everything anyway.
//! `current_step` is always clamped into the declared range.

use aula_types::wizard::{ValidationResult, WizardPatch, WizardStep};

use super::store::WizardStore;
use super::validator::validate_step;

/// Result of [`NavigationController::handle_next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    /// Moved forward to this step.
    Advanced(WizardStep),
    /// The current step does not validate; nothing changed.
    Blocked(ValidationResult),
    /// Already on the terminal step; submission is the only way forward.
    AtTerminal,
}

#[derive(Clone)]
pub struct NavigationController {
    store: WizardStore,
}

impl NavigationController {
    pub fn new(store: WizardStore) -> Self {
        Self { store }
    }

    pub fn current_step(&self) -> WizardStep {
        self.store.read(|s| s.current_step)
    }

    /// Validation of the step being viewed. Recomputed on every call.
    pub fn current_validation(&self) -> ValidationResult {
        self.store.read(|s| validate_step(s.current_step, s))
    }

    /// Whether `handle_next` would advance. Never cached: the state may have
    /// changed since the last read.
    pub fn can_proceed(&self) -> bool {
        self.current_validation().is_valid
    }

    pub fn handle_next(&self) -> NextOutcome {
        let validation = self.current_validation();
        if !validation.is_valid {
            tracing::debug!(
                step = self.current_step().number(),
                errors = validation.errors.len(),
                "Forward navigation blocked"
            );
            return NextOutcome::Blocked(validation);
        }

        match self.current_step().next() {
            Some(next) => {
                self.move_to(next);
                NextOutcome::Advanced(next)
            }
            None => NextOutcome::AtTerminal,
        }
    }

    /// Step back one step; stays on the first step.
    pub fn handle_back(&self) -> WizardStep {
        match self.current_step().previous() {
            Some(previous) => {
                self.move_to(previous);
                previous
            }
            None => WizardStep::first(),
        }
    }

    /// Jump to step `n` (clamped into range) without validating.
    pub fn go_to_step(&self, n: i64) -> WizardStep {
        let target = WizardStep::clamped(n);
        if target != self.current_step() {
            self.move_to(target);
        }
        target
    }

    fn move_to(&self, step: WizardStep) {
        self.store.update_state(WizardPatch {
            current_step: Some(step),
            ..Default::default()
        });
    }
}
