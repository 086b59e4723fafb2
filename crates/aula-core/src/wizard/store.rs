//! WizardStore -- the single owner of `WizardState`.
//!
//! Every mutation goes through [`WizardStore::update_state`] (or the two
//! constrained operations `set_content_type` and `reset`). Readers take a
//! snapshot; nothing hands out a mutable reference. Each mutation is
//! announced on a `watch` channel so the draft autosaver can debounce writes
//! without the store knowing anything about persistence.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use aula_types::wizard::{
    BnccSkill, ClassContext, ClassSummary, ContentType, MAX_SPECIFIC_IDEA_CHARS, WizardPatch,
    WizardState,
};

/// What the last mutation of the store was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// No mutation yet.
    Opened,
    /// Answers or position changed; worth persisting.
    Updated,
    /// The store went back to defaults; any pending write is stale.
    Reset,
}

struct StoreInner {
    state: RwLock<WizardState>,
    changes: watch::Sender<StoreChange>,
}

/// Shared handle to the wizard state. Cloning produces another view of the
/// same state.
#[derive(Clone)]
pub struct WizardStore {
    inner: Arc<StoreInner>,
}

impl WizardStore {
    pub fn new(initial: WizardState) -> Self {
        let (changes, _) = watch::channel(StoreChange::Opened);
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial),
                changes,
            }),
        }
    }

    /// A consistent copy of the current state.
    pub fn snapshot(&self) -> WizardState {
        self.read(Clone::clone)
    }

    /// Run `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&WizardState) -> R) -> R {
        let state = self.inner.state.read().expect("wizard state lock poisoned");
        f(&state)
    }

    pub fn content_type(&self) -> ContentType {
        self.read(|s| s.content_type)
    }

    /// Receive a notification after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<StoreChange> {
        self.inner.changes.subscribe()
    }

    /// Merge `patch` into the state (last write wins per field) and return
    /// the new state.
    pub fn update_state(&self, patch: WizardPatch) -> WizardState {
        let updated = {
            let mut state = self.inner.state.write().expect("wizard state lock poisoned");
            apply_patch(&mut state, patch);
            state.clone()
        };
        self.inner.changes.send_replace(StoreChange::Updated);
        updated
    }

    /// Change the content type. Answers are kept; later draft writes go to
    /// the new type's key.
    pub fn set_content_type(&self, content_type: ContentType) -> WizardState {
        let updated = {
            let mut state = self.inner.state.write().expect("wizard state lock poisoned");
            state.content_type = content_type;
            state.clone()
        };
        self.inner.changes.send_replace(StoreChange::Updated);
        updated
    }

    /// Restore default answers for the current content type.
    pub fn reset(&self) -> WizardState {
        let fresh = {
            let mut state = self.inner.state.write().expect("wizard state lock poisoned");
            *state = WizardState::new(state.content_type);
            state.clone()
        };
        self.inner.changes.send_replace(StoreChange::Reset);
        fresh
    }

    // -----------------------------------------------------------------------
    // Convenience updates (all routed through update_state)
    // -----------------------------------------------------------------------

    /// Link a class from the directory and pre-fill context from its roster.
    pub fn link_class(&self, class: &ClassSummary) -> WizardState {
        let mut patch = WizardPatch {
            class_id: Some(Some(class.id.clone())),
            class_context: Some(Some(ClassContext::from(class))),
            grade: Some(class.grade.clone()),
            subject: Some(class.subject.clone()),
            ..Default::default()
        };
        if class.total_students > 0 {
            patch.students_per_class = Some(class.total_students);
        }
        self.update_state(patch)
    }

    pub fn unlink_class(&self) -> WizardState {
        self.update_state(WizardPatch {
            class_id: Some(None),
            class_context: Some(None),
            ..Default::default()
        })
    }

    /// Add a skill, replacing any existing skill with the same code.
    pub fn add_skill(&self, skill: BnccSkill) -> WizardState {
        let mut skills = self.read(|s| s.bncc_skills.clone());
        skills.push(skill);
        self.update_state(WizardPatch {
            bncc_skills: Some(skills),
            ..Default::default()
        })
    }

    pub fn remove_skill(&self, code: &str) -> WizardState {
        let mut skills = self.read(|s| s.bncc_skills.clone());
        skills.retain(|s| s.code != code);
        self.update_state(WizardPatch {
            bncc_skills: Some(skills),
            ..Default::default()
        })
    }

    pub fn toggle_methodology(&self, id: &str) -> WizardState {
        let methodologies = toggled(self.read(|s| s.methodologies.clone()), id);
        self.update_state(WizardPatch {
            methodologies: Some(methodologies),
            ..Default::default()
        })
    }

    pub fn toggle_accessibility_option(&self, id: &str) -> WizardState {
        let options = toggled(self.read(|s| s.accessibility_options.clone()), id);
        self.update_state(WizardPatch {
            accessibility_options: Some(options),
            ..Default::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Merge + normalization
// ---------------------------------------------------------------------------

/// Shallow-merge `patch` into `state`, keeping set-valued fields unique and
/// free text within bounds.
pub fn apply_patch(state: &mut WizardState, patch: WizardPatch) {
    let WizardPatch {
        current_step,
        grade,
        subject,
        class_id,
        class_context,
        topic,
        bncc_skills,
        methodologies,
        difficulty_level,
        template_id,
        specific_idea,
        students_per_class,
        number_of_lessons,
        duration_per_lesson,
        no_digital_resources,
        accessibility_options,
    } = patch;

    if let Some(step) = current_step {
        state.current_step = step;
    }
    if let Some(grade) = grade {
        state.grade = grade;
    }
    if let Some(subject) = subject {
        state.subject = subject;
    }
    if let Some(class_id) = class_id {
        state.class_id = non_blank(class_id);
    }
    if let Some(class_context) = class_context {
        state.class_context = class_context;
    }
    if let Some(topic) = topic {
        state.topic = topic;
    }
    if let Some(skills) = bncc_skills {
        state.bncc_skills = dedup_skills(skills);
    }
    if let Some(ids) = methodologies {
        state.methodologies = dedup_ids(ids);
    }
    if let Some(level) = difficulty_level {
        state.difficulty_level = level;
    }
    if let Some(template_id) = template_id {
        state.template_id = non_blank(template_id);
    }
    if let Some(idea) = specific_idea {
        state.specific_idea = truncate_chars(idea, MAX_SPECIFIC_IDEA_CHARS);
    }
    if let Some(n) = students_per_class {
        state.students_per_class = n;
    }
    if let Some(n) = number_of_lessons {
        state.number_of_lessons = n;
    }
    if let Some(minutes) = duration_per_lesson {
        state.duration_per_lesson = minutes;
    }
    if let Some(flag) = no_digital_resources {
        state.no_digital_resources = flag;
    }
    if let Some(ids) = accessibility_options {
        state.accessibility_options = dedup_ids(ids);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Trim, drop blanks, keep the first occurrence of each id.
fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim().to_string();
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// One entry per code: the first occurrence keeps its position, the last
/// occurrence supplies the description and relevance.
fn dedup_skills(skills: Vec<BnccSkill>) -> Vec<BnccSkill> {
    let mut out: Vec<BnccSkill> = Vec::with_capacity(skills.len());
    for skill in skills {
        if skill.code.trim().is_empty() {
            continue;
        }
        match out.iter_mut().find(|existing| existing.code == skill.code) {
            Some(existing) => *existing = skill,
            None => out.push(skill),
        }
    }
    out
}

fn toggled(mut ids: Vec<String>, id: &str) -> Vec<String> {
    if ids.iter().any(|existing| existing == id) {
        ids.retain(|existing| existing != id);
    } else {
        ids.push(id.to_string());
    }
    ids
}

fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text,
    }
}
