//! Projection of the wizard state into a generation request body.

use aula_types::generation::{ClassContextPayload, GenerationRequest};
use aula_types::wizard::WizardState;

use crate::wizard::catalog::{accessibility_label, methodology_name};

/// Build the request for `state`. Deterministic: the same state always
/// yields the same request.
///
/// Optional identifiers are included only when present, and the class
/// snapshot only when a class is actually linked.
pub fn build_request(state: &WizardState) -> GenerationRequest {
    let methodology = state
        .methodologies
        .iter()
        .map(|id| methodology_name(id))
        .collect::<Vec<_>>()
        .join(", ");

    let accessibility_options = state
        .accessibility_options
        .iter()
        .map(|id| accessibility_label(id).to_string())
        .collect();

    let bncc_code = if state.bncc_skills.is_empty() {
        None
    } else {
        Some(
            state
                .bncc_skills
                .iter()
                .map(|s| s.code.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    };

    let linked = state.has_linked_class();
    let class_id = state.class_id.clone().filter(|_| linked);
    let class_context = state
        .class_context
        .as_ref()
        .filter(|_| linked)
        .map(|ctx| ClassContextPayload {
            total_students: ctx.student_count,
            has_special_needs: ctx.has_special_needs,
            special_needs_notes: ctx.special_needs_notes.clone(),
        });

    let template_id = state
        .template_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    GenerationRequest {
        topic: state.topic.trim().to_string(),
        grade: state.grade.clone(),
        subject: state.subject.clone(),
        methodology,
        difficulty_level: state.difficulty_level.as_str().to_string(),
        duration_minutes: state.total_duration_minutes(),
        accessibility_options,
        specific_idea: state.specific_idea.clone(),
        students_per_class: state.students_per_class,
        number_of_lessons: state.number_of_lessons,
        no_digital_resources: state.no_digital_resources,
        bncc_code,
        class_id,
        class_context,
        template_id,
    }
}
