//! Per-step validation.
//!
//! Pure functions from `(step, state)` to a [`ValidationResult`]. Each step
//! has its own rule set; the terminal step composes the rules of every step
//! whose answers the request cannot do without, so jumping around with
//! `go_to_step` can never smuggle an incomplete request past the gate.

use aula_types::wizard::{
    MIN_LESSON_DURATION, MIN_NUMBER_OF_LESSONS, MIN_STUDENTS_PER_CLASS, ValidationResult,
    WizardState, WizardStep,
};

/// Steps whose rules must hold before the request can be submitted.
const TERMINAL_PREREQUISITES: &[WizardStep] = &[WizardStep::Context, WizardStep::Objectives];

/// Validate the answers belonging to `step`.
pub fn validate_step(step: WizardStep, state: &WizardState) -> ValidationResult {
    ValidationResult::from_errors(step_errors(step, state))
}

/// Whether `step` currently validates. Drives progress indicators only.
pub fn is_step_complete(step: WizardStep, state: &WizardState) -> bool {
    validate_step(step, state).is_valid
}

fn step_errors(step: WizardStep, state: &WizardState) -> Vec<String> {
    match step {
        WizardStep::Context => context_errors(state),
        WizardStep::Objectives => objectives_errors(state),
        WizardStep::Strategy => Vec::new(),
        WizardStep::Configuration => configuration_errors(state),
        WizardStep::Review => TERMINAL_PREREQUISITES
            .iter()
            .flat_map(|prerequisite| step_errors(*prerequisite, state))
            .collect(),
    }
}

fn context_errors(state: &WizardState) -> Vec<String> {
    if state.has_linked_class() {
        return Vec::new();
    }

    let mut errors = Vec::new();
    if state.grade.trim().is_empty() {
        errors.push("Grade is required (or select one of your classes)".to_string());
    }
    if state.subject.trim().is_empty() {
        errors.push("Subject is required (or select one of your classes)".to_string());
    }
    errors
}

fn objectives_errors(state: &WizardState) -> Vec<String> {
    if state.topic.trim().is_empty() {
        vec!["Topic is required".to_string()]
    } else {
        Vec::new()
    }
}

/// Lower bounds only; the upper limits belong to the input controls.
fn configuration_errors(state: &WizardState) -> Vec<String> {
    let mut errors = Vec::new();

    if state.students_per_class < MIN_STUDENTS_PER_CLASS {
        errors.push("Students per class must be greater than zero".to_string());
    }
    if state.number_of_lessons < MIN_NUMBER_OF_LESSONS {
        errors.push("Number of lessons must be greater than zero".to_string());
    }
    if state.duration_per_lesson < MIN_LESSON_DURATION {
        errors.push(format!(
            "Lesson duration must be at least {MIN_LESSON_DURATION} minutes"
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_types::wizard::ContentType;

    fn filled() -> WizardState {
        let mut state = WizardState::new(ContentType::LessonPlan);
        state.grade = "6th grade".to_string();
        state.subject = "Mathematics".to_string();
        state.topic = "Fractions".to_string();
        state
    }

    #[test]
    fn test_context_requires_grade_and_subject() {
        let state = WizardState::default();
        let result = validate_step(WizardStep::Context, &state);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);

        let mut state = WizardState::default();
        state.grade = "6th grade".to_string();
        let result = validate_step(WizardStep::Context, &state);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Subject"));
    }

    #[test]
    fn test_context_valid_with_linked_class_regardless_of_fields() {
        for (grade, subject) in [("", ""), ("6th grade", ""), ("", "Art")] {
            let mut state = WizardState::default();
            state.grade = grade.to_string();
            state.subject = subject.to_string();
            state.class_id = Some("class-1".to_string());
            assert!(validate_step(WizardStep::Context, &state).is_valid);
        }
    }

    #[test]
    fn test_context_whitespace_class_id_counts_as_linked() {
        let mut state = WizardState::default();
        state.class_id = Some(" ".to_string());
        assert!(validate_step(WizardStep::Context, &state).is_valid);

        state.class_id = Some(String::new());
        assert!(!validate_step(WizardStep::Context, &state).is_valid);
    }

    #[test]
    fn test_objectives_requires_trimmed_topic() {
        for topic in ["", "   ", "\n\t"] {
            let mut state = filled();
            state.topic = topic.to_string();
            let result = validate_step(WizardStep::Objectives, &state);
            assert!(!result.is_valid);
            assert!(!result.errors.is_empty());
        }
        assert!(validate_step(WizardStep::Objectives, &filled()).is_valid);
    }

    #[test]
    fn test_strategy_always_valid() {
        assert!(validate_step(WizardStep::Strategy, &WizardState::default()).is_valid);
    }

    #[test]
    fn test_configuration_zero_students_then_fixed() {
        let mut state = filled();
        state.current_step = WizardStep::Configuration;
        state.students_per_class = 0;

        let result = validate_step(WizardStep::Configuration, &state);
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .iter()
                .any(|e| e.contains("must be greater than zero"))
        );

        state.students_per_class = 30;
        assert!(validate_step(WizardStep::Configuration, &state).is_valid);
    }

    #[test]
    fn test_configuration_one_error_per_violated_bound() {
        let mut state = filled();
        state.students_per_class = 0;
        state.number_of_lessons = 0;
        state.duration_per_lesson = 10;
        let result = validate_step(WizardStep::Configuration, &state);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_configuration_has_no_upper_bounds() {
        let mut state = filled();
        state.students_per_class = 101;
        state.number_of_lessons = 21;
        state.duration_per_lesson = 181;
        let result = validate_step(WizardStep::Configuration, &state);
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_duration_lower_bound_is_inclusive() {
        let mut state = filled();
        state.duration_per_lesson = MIN_LESSON_DURATION;
        assert!(validate_step(WizardStep::Configuration, &state).is_valid);
        state.duration_per_lesson = MIN_LESSON_DURATION - 1;
        assert!(!validate_step(WizardStep::Configuration, &state).is_valid);
    }

    #[test]
    fn test_review_composes_context_and_objectives() {
        let state = WizardState::default();
        let result = validate_step(WizardStep::Review, &state);
        assert!(!result.is_valid);
        // two context errors followed by the objectives error
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.errors[2], "Topic is required");

        assert!(validate_step(WizardStep::Review, &filled()).is_valid);
    }

    #[test]
    fn test_review_ignores_viewed_step() {
        let mut state = WizardState::default();
        state.current_step = WizardStep::Strategy;
        assert!(!validate_step(WizardStep::Review, &state).is_valid);
    }

    #[test]
    fn test_is_step_complete_matches_validation() {
        let state = filled();
        for step in WizardStep::all() {
            assert_eq!(
                is_step_complete(*step, &state),
                validate_step(*step, &state).is_valid
            );
        }
    }
}
