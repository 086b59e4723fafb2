//! Wizard domain types.
//!
//! `WizardState` is the single record describing an in-progress lesson
//! request: which step the user is on, which kind of content they want,
//! and every answer collected so far. It serializes with camelCase keys so
//! persisted drafts keep the `{state, timestamp, contentType}` envelope shape.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field bounds
// ---------------------------------------------------------------------------

/// Minimum students per class accepted by the configuration step.
pub const MIN_STUDENTS_PER_CLASS: u32 = 1;
/// Maximum students per class offered by the input controls.
pub const MAX_STUDENTS_PER_CLASS: u32 = 100;
/// Minimum number of lessons in a sequence.
pub const MIN_NUMBER_OF_LESSONS: u32 = 1;
/// Maximum number of lessons in a sequence.
pub const MAX_NUMBER_OF_LESSONS: u32 = 20;
/// Minimum lesson duration in minutes.
pub const MIN_LESSON_DURATION: u32 = 15;
/// Maximum lesson duration in minutes.
pub const MAX_LESSON_DURATION: u32 = 180;
/// Maximum length (in characters) of the free-text instructions field.
pub const MAX_SPECIFIC_IDEA_CHARS: usize = 1000;

/// Prefix of the durable key each draft is stored under.
pub const DRAFT_KEY_PREFIX: &str = "wizard_draft_";

// ---------------------------------------------------------------------------
// ContentType
// ---------------------------------------------------------------------------

/// The kind of material being requested. Selects the remote endpoint and the
/// draft slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    LessonPlan,
    Activity,
    Assessment,
}

impl ContentType {
    /// Every content type, in menu order.
    pub fn all() -> &'static [ContentType] {
        &[Self::LessonPlan, Self::Activity, Self::Assessment]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LessonPlan => "lesson_plan",
            Self::Activity => "activity",
            Self::Assessment => "assessment",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LessonPlan => "Lesson plan",
            Self::Activity => "Activity",
            Self::Assessment => "Assessment",
        }
    }

    /// Name of the remote generation function serving this content type.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::LessonPlan => "generate-lesson-plan",
            Self::Activity => "generate-activity",
            Self::Assessment => "generate-assessment",
        }
    }

    /// Durable storage key for this content type's draft.
    pub fn draft_key(&self) -> String {
        format!("{DRAFT_KEY_PREFIX}{}", self.as_str())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "lesson_plan" | "lesson" => Ok(Self::LessonPlan),
            "activity" | "worksheet" => Ok(Self::Activity),
            "assessment" | "quiz" => Ok(Self::Assessment),
            other => Err(format!("invalid content type: '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// WizardStep
// ---------------------------------------------------------------------------

/// Steps of the questionnaire, numbered from 1.
///
/// Serialized as its step number so drafts store `"currentStep": 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    Context = 1,
    Objectives = 2,
    Strategy = 3,
    Configuration = 4,
    Review = 5,
}

impl WizardStep {
    /// All steps in order.
    pub fn all() -> &'static [WizardStep] {
        &[
            Self::Context,
            Self::Objectives,
            Self::Strategy,
            Self::Configuration,
            Self::Review,
        ]
    }

    pub fn first() -> Self {
        Self::Context
    }

    /// The terminal step, where the request is submitted.
    pub fn last() -> Self {
        Self::Review
    }

    pub fn total() -> u8 {
        5
    }

    /// 1-indexed step number.
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Context),
            2 => Some(Self::Objectives),
            3 => Some(Self::Strategy),
            4 => Some(Self::Configuration),
            5 => Some(Self::Review),
            _ => None,
        }
    }

    /// Map any integer into the declared step range.
    pub fn clamped(n: i64) -> Self {
        let bounded = n.clamp(1, i64::from(Self::total()));
        // bounded is within 1..=total, so the lookup cannot miss
        Self::from_number(bounded as u8).unwrap_or(Self::Context)
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn is_terminal(&self) -> bool {
        *self == Self::last()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Context => "Context",
            Self::Objectives => "Objectives",
            Self::Strategy => "Strategy",
            Self::Configuration => "Configuration",
            Self::Review => "Review",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Context => "Who is this for?",
            Self::Objectives => "What should students learn?",
            Self::Strategy => "How do you want to teach it?",
            Self::Configuration => "Class size and timing",
            Self::Review => "Check everything before generating",
        }
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| format!("step {n} is out of range"))
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.number(), Self::total(), self.title())
    }
}

// ---------------------------------------------------------------------------
// Answer value types
// ---------------------------------------------------------------------------

/// Difficulty requested for the generated material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub fn all() -> &'static [DifficultyLevel] {
        &[Self::Basic, Self::Intermediate, Self::Advanced]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A curriculum (BNCC) skill attached to the objectives. Unique by `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BnccSkill {
    pub code: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<String>,
}

/// A class as returned by the remote class directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub id: String,
    pub subject: String,
    pub grade: String,
    #[serde(default)]
    pub total_students: u32,
    #[serde(default)]
    pub has_special_needs: bool,
    #[serde(default)]
    pub special_needs_notes: Option<String>,
}

/// Snapshot of a linked class, copied into the wizard at link time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassContext {
    pub student_count: u32,
    pub has_special_needs: bool,
    #[serde(default)]
    pub special_needs_notes: Option<String>,
}

impl From<&ClassSummary> for ClassContext {
    fn from(class: &ClassSummary) -> Self {
        Self {
            student_count: class.total_students,
            has_special_needs: class.has_special_needs,
            special_needs_notes: class.special_needs_notes.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// WizardState
// ---------------------------------------------------------------------------

/// All answers of one wizard session.
///
/// Missing keys fall back to defaults when deserializing, so drafts written
/// by older builds still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardState {
    pub current_step: WizardStep,
    pub content_type: ContentType,

    // Context
    pub grade: String,
    pub subject: String,
    pub class_id: Option<String>,
    pub class_context: Option<ClassContext>,

    // Objectives
    pub topic: String,
    pub bncc_skills: Vec<BnccSkill>,

    // Strategy
    pub methodologies: Vec<String>,
    pub difficulty_level: DifficultyLevel,
    pub template_id: Option<String>,
    pub specific_idea: String,

    // Configuration
    pub students_per_class: u32,
    pub number_of_lessons: u32,
    pub duration_per_lesson: u32,
    pub no_digital_resources: bool,
    pub accessibility_options: Vec<String>,
}

impl WizardState {
    /// Default answers for a fresh session of the given content type.
    pub fn new(content_type: ContentType) -> Self {
        let (number_of_lessons, duration_per_lesson) = match content_type {
            ContentType::LessonPlan => (1, 50),
            ContentType::Activity => (1, 30),
            ContentType::Assessment => (1, 50),
        };

        Self {
            current_step: WizardStep::first(),
            content_type,
            grade: String::new(),
            subject: String::new(),
            class_id: None,
            class_context: None,
            topic: String::new(),
            bncc_skills: Vec::new(),
            methodologies: Vec::new(),
            difficulty_level: DifficultyLevel::default(),
            template_id: None,
            specific_idea: String::new(),
            students_per_class: 30,
            number_of_lessons,
            duration_per_lesson,
            no_digital_resources: false,
            accessibility_options: Vec::new(),
        }
    }

    /// Total class time across all lessons, in minutes.
    pub fn total_duration_minutes(&self) -> u32 {
        self.number_of_lessons
            .saturating_mul(self.duration_per_lesson)
    }

    /// Whether a class from the directory is linked.
    pub fn has_linked_class(&self) -> bool {
        self.class_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }

    /// Label/value pairs shown on the review step.
    pub fn summary_lines(&self) -> Vec<(&'static str, String)> {
        let or_dash = |s: &str| {
            if s.trim().is_empty() {
                "-".to_string()
            } else {
                s.to_string()
            }
        };
        let join_or_dash = |items: &[String]| {
            if items.is_empty() {
                "-".to_string()
            } else {
                items.join(", ")
            }
        };

        let skills: Vec<String> = self.bncc_skills.iter().map(|s| s.code.clone()).collect();

        vec![
            ("Content", self.content_type.label().to_string()),
            ("Grade", or_dash(&self.grade)),
            ("Subject", or_dash(&self.subject)),
            ("Class", self.class_id.clone().unwrap_or_else(|| "-".to_string())),
            ("Topic", or_dash(&self.topic)),
            ("BNCC skills", join_or_dash(&skills)),
            ("Methodologies", join_or_dash(&self.methodologies)),
            ("Difficulty", self.difficulty_level.to_string()),
            ("Template", self.template_id.clone().unwrap_or_else(|| "-".to_string())),
            ("Instructions", or_dash(&self.specific_idea)),
            ("Students", self.students_per_class.to_string()),
            (
                "Lessons",
                format!(
                    "{} x {} min",
                    self.number_of_lessons, self.duration_per_lesson
                ),
            ),
            (
                "Digital resources",
                if self.no_digital_resources { "no" } else { "yes" }.to_string(),
            ),
            ("Accessibility", join_or_dash(&self.accessibility_options)),
        ]
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(ContentType::default())
    }
}

// ---------------------------------------------------------------------------
// WizardPatch
// ---------------------------------------------------------------------------

/// A partial `WizardState`: every `Some` field overwrites the stored value.
///
/// Fields that are themselves optional use `Option<Option<T>>` so a patch can
/// clear them (`Some(None)`). The content type is absent on purpose; it is
/// changed through the store's dedicated operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardPatch {
    pub current_step: Option<WizardStep>,
    pub grade: Option<String>,
    pub subject: Option<String>,
    pub class_id: Option<Option<String>>,
    pub class_context: Option<Option<ClassContext>>,
    pub topic: Option<String>,
    pub bncc_skills: Option<Vec<BnccSkill>>,
    pub methodologies: Option<Vec<String>>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub template_id: Option<Option<String>>,
    pub specific_idea: Option<String>,
    pub students_per_class: Option<u32>,
    pub number_of_lessons: Option<u32>,
    pub duration_per_lesson: Option<u32>,
    pub no_digital_resources: Option<bool>,
    pub accessibility_options: Option<Vec<String>>,
}

impl WizardPatch {
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_students_per_class(mut self, n: u32) -> Self {
        self.students_per_class = Some(n);
        self
    }

    pub fn with_number_of_lessons(mut self, n: u32) -> Self {
        self.number_of_lessons = Some(n);
        self
    }

    pub fn with_duration_per_lesson(mut self, minutes: u32) -> Self {
        self.duration_per_lesson = Some(minutes);
        self
    }

    pub fn with_methodologies(mut self, ids: Vec<String>) -> Self {
        self.methodologies = Some(ids);
        self
    }

    pub fn with_specific_idea(mut self, text: impl Into<String>) -> Self {
        self.specific_idea = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Validation + persistence envelopes
// ---------------------------------------------------------------------------

/// Outcome of validating one step. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Valid iff `errors` is empty.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// The envelope written to durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDraft {
    pub state: WizardState,
    /// Save time, epoch milliseconds.
    pub timestamp: i64,
    pub content_type: String,
}

/// Lightweight description of a saved draft, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSummary {
    pub content_type: ContentType,
    pub topic: String,
    pub current_step: WizardStep,
    pub saved_at: DateTime<Utc>,
}
