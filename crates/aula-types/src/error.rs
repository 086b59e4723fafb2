use thiserror::Error;

use crate::wizard::WizardStep;

/// Errors from storage and remote-directory ports (used by trait definitions in aula-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by wizard session operations.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("step '{}' is incomplete: {}", step.title(), errors.join("; "))]
    Blocked {
        step: WizardStep,
        errors: Vec<String>,
    },

    #[error("generation is only available from the '{}' step (currently on '{}')", WizardStep::last().title(), current.title())]
    NotAtTerminalStep { current: WizardStep },

    #[error("the request was already submitted; reset the wizard to start over")]
    AlreadySubmitted,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors related to configuration parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(String),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_blocked_error_lists_reasons() {
        let err = WizardError::Blocked {
            step: WizardStep::Objectives,
            errors: vec!["Topic is required".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "step 'Objectives' is incomplete: Topic is required"
        );
    }

    #[test]
    fn test_not_at_terminal_step_names_both_steps() {
        let err = WizardError::NotAtTerminalStep {
            current: WizardStep::Strategy,
        };
        let msg = err.to_string();
        assert!(msg.contains("Review"));
        assert!(msg.contains("Strategy"));
    }

    #[test]
    fn test_storage_error_converts() {
        let err: WizardError = RepositoryError::NotFound.into();
        assert!(err.to_string().contains("entity not found"));
    }
}
