//! Read-only directory ports used to pre-fill the wizard.
//!
//! Classes seed the context step; skill suggestions seed the objectives step.
//! Neither is required to finish the wizard. Implementations live in
//! aula-infra (`HttpClassDirectory`, `HttpSkillSuggester`).

use std::future::Future;

use serde::Serialize;

use aula_types::error::RepositoryError;
use aula_types::wizard::{BnccSkill, ClassSummary, WizardState};

use crate::auth::AuthSession;

/// Lists the classes the signed-in user owns.
pub trait ClassDirectory: Send + Sync {
    /// Classes in display order.
    fn list_classes(
        &self,
        session: &AuthSession,
    ) -> impl Future<Output = Result<Vec<ClassSummary>, RepositoryError>> + Send;
}

/// Body of a skill suggestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillQuery {
    pub grade: String,
    pub subject: String,
    pub topic: String,
}

impl SkillQuery {
    /// Query for the current answers, or `None` if the topic is still blank.
    pub fn from_state(state: &WizardState) -> Option<Self> {
        let topic = state.topic.trim();
        if topic.is_empty() {
            return None;
        }
        Some(Self {
            grade: state.grade.clone(),
            subject: state.subject.clone(),
            topic: topic.to_string(),
        })
    }
}

/// Suggests curriculum skills for a topic.
pub trait SkillSuggester: Send + Sync {
    fn suggest_skills(
        &self,
        session: &AuthSession,
        query: &SkillQuery,
    ) -> impl Future<Output = Result<Vec<BnccSkill>, RepositoryError>> + Send;
}
