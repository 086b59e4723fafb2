//! Interactive prompts for each wizard step.
//!
//! Every prompt reads the current answers and returns a [`WizardPatch`] (or a
//! small answer enum); applying it is left to the wizard loop so the session
//! stays the only writer.

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use aula_core::wizard::catalog::{
    ACCESSIBILITY_OPTIONS, CatalogEntry, GRADES, METHODOLOGIES, SUBJECTS,
};
use aula_types::wizard::{
    BnccSkill, ClassSummary, DifficultyLevel, MAX_LESSON_DURATION, MAX_NUMBER_OF_LESSONS,
    MAX_SPECIFIC_IDEA_CHARS, MAX_STUDENTS_PER_CLASS, MIN_LESSON_DURATION, MIN_NUMBER_OF_LESSONS,
    MIN_STUDENTS_PER_CLASS, WizardPatch, WizardState, WizardStep,
};

/// How the context step was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextAnswer {
    Linked(ClassSummary),
    Manual { grade: String, subject: String },
}

/// Menu shown after a non-terminal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Continue,
    Back,
    SaveAndQuit,
    StartOver,
}

/// Menu shown on the review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Generate,
    Edit(WizardStep),
    SaveAndQuit,
    StartOver,
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Index of `current` in `options`, or 0.
pub fn default_index(options: &[&str], current: &str) -> usize {
    options.iter().position(|o| *o == current).unwrap_or(0)
}

/// Which catalog entries start checked.
pub fn checked_entries(entries: &[CatalogEntry], selected: &[String]) -> Vec<bool> {
    entries
        .iter()
        .map(|e| selected.iter().any(|id| id == e.id))
        .collect()
}

/// Ids picked from `entries`, followed by any previously selected ids the
/// catalog does not know (kept so an older draft loses nothing).
pub fn picked_ids(entries: &[CatalogEntry], picks: &[usize], previous: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = picks
        .iter()
        .filter_map(|i| entries.get(*i))
        .map(|e| e.id.to_string())
        .collect();
    for id in previous {
        if !entries.iter().any(|e| e.id == id) && !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

/// Suggestions merged with the skills already chosen; chosen ones first,
/// unique by code.
pub fn skill_choices(current: &[BnccSkill], suggestions: Vec<BnccSkill>) -> Vec<BnccSkill> {
    let mut choices: Vec<BnccSkill> = current.to_vec();
    for skill in suggestions {
        if !choices.iter().any(|c| c.code == skill.code) {
            choices.push(skill);
        }
    }
    choices
}

/// Keep at most [`MAX_SPECIFIC_IDEA_CHARS`] characters.
pub fn clip_instructions(text: &str) -> String {
    text.chars().take(MAX_SPECIFIC_IDEA_CHARS).collect()
}

/// Range check for the numeric inputs of the configuration step.
pub fn within_bounds(value: u32, min: u32, max: u32) -> Result<(), String> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("Enter a number from {min} to {max}"))
    }
}

fn class_label(class: &ClassSummary) -> String {
    format!(
        "{} -- {} ({} students)",
        class.subject, class.grade, class.total_students
    )
}

// ---------------------------------------------------------------------------
// Step prompts
// ---------------------------------------------------------------------------

/// Context: pick one of the user's classes or enter grade and subject.
pub fn prompt_context(state: &WizardState, classes: &[ClassSummary]) -> Result<ContextAnswer> {
    if !classes.is_empty() {
        let mut items: Vec<String> = classes.iter().map(class_label).collect();
        items.push("Enter grade and subject manually".to_string());

        let default = state
            .class_id
            .as_deref()
            .and_then(|id| classes.iter().position(|c| c.id == id))
            .unwrap_or(0);

        let selection = Select::new()
            .with_prompt("Which class is this for?")
            .items(&items)
            .default(default)
            .interact()?;

        if let Some(class) = classes.get(selection) {
            return Ok(ContextAnswer::Linked(class.clone()));
        }
    }

    let grade = Select::new()
        .with_prompt("Grade")
        .items(GRADES)
        .default(default_index(GRADES, &state.grade))
        .interact()?;
    let subject = Select::new()
        .with_prompt("Subject")
        .items(SUBJECTS)
        .default(default_index(SUBJECTS, &state.subject))
        .interact()?;

    Ok(ContextAnswer::Manual {
        grade: GRADES[grade].to_string(),
        subject: SUBJECTS[subject].to_string(),
    })
}

pub fn prompt_topic(state: &WizardState) -> Result<String> {
    let topic: String = Input::new()
        .with_prompt("Topic")
        .with_initial_text(state.topic.clone())
        .allow_empty(true)
        .interact_text()?;
    Ok(topic)
}

/// Let the user keep or drop chosen skills and add suggested ones.
pub fn prompt_skills(current: &[BnccSkill], suggestions: Vec<BnccSkill>) -> Result<Vec<BnccSkill>> {
    let choices = skill_choices(current, suggestions);
    if choices.is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<String> = choices
        .iter()
        .map(|s| format!("{} -- {}", s.code, style(&s.description).dim()))
        .collect();
    let defaults: Vec<bool> = choices
        .iter()
        .map(|s| current.iter().any(|c| c.code == s.code))
        .collect();

    let picks = MultiSelect::new()
        .with_prompt("BNCC skills (space to toggle)")
        .items(&items)
        .defaults(&defaults)
        .interact()?;

    Ok(picks
        .into_iter()
        .filter_map(|i| choices.get(i).cloned())
        .collect())
}

pub fn prompt_strategy(state: &WizardState) -> Result<WizardPatch> {
    let labels: Vec<&str> = METHODOLOGIES.iter().map(|e| e.label).collect();
    let picks = MultiSelect::new()
        .with_prompt("Methodologies (space to toggle)")
        .items(&labels)
        .defaults(&checked_entries(METHODOLOGIES, &state.methodologies))
        .interact()?;

    let levels: Vec<&str> = DifficultyLevel::all().iter().map(|d| d.as_str()).collect();
    let level = Select::new()
        .with_prompt("Difficulty")
        .items(&levels)
        .default(default_index(&levels, state.difficulty_level.as_str()))
        .interact()?;

    let idea: String = Input::new()
        .with_prompt("Specific instructions (optional)")
        .with_initial_text(state.specific_idea.clone())
        .allow_empty(true)
        .interact_text()?;

    let template: String = Input::new()
        .with_prompt("Template id (optional)")
        .with_initial_text(state.template_id.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    let template = template.trim();

    let mut patch = WizardPatch::default()
        .with_methodologies(picked_ids(METHODOLOGIES, &picks, &state.methodologies))
        .with_specific_idea(clip_instructions(&idea));
    patch.difficulty_level = DifficultyLevel::all().get(level).copied();
    patch.template_id = Some((!template.is_empty()).then(|| template.to_string()));
    Ok(patch)
}

pub fn prompt_configuration(state: &WizardState) -> Result<WizardPatch> {
    let students: u32 = Input::new()
        .with_prompt("Students per class")
        .default(state.students_per_class)
        .validate_with(|n: &u32| within_bounds(*n, MIN_STUDENTS_PER_CLASS, MAX_STUDENTS_PER_CLASS))
        .interact_text()?;
    let lessons: u32 = Input::new()
        .with_prompt("Number of lessons")
        .default(state.number_of_lessons)
        .validate_with(|n: &u32| within_bounds(*n, MIN_NUMBER_OF_LESSONS, MAX_NUMBER_OF_LESSONS))
        .interact_text()?;
    let minutes: u32 = Input::new()
        .with_prompt("Minutes per lesson")
        .default(state.duration_per_lesson)
        .validate_with(|n: &u32| within_bounds(*n, MIN_LESSON_DURATION, MAX_LESSON_DURATION))
        .interact_text()?;
    let no_digital = Confirm::new()
        .with_prompt("Avoid digital resources?")
        .default(state.no_digital_resources)
        .interact()?;

    let labels: Vec<&str> = ACCESSIBILITY_OPTIONS.iter().map(|e| e.label).collect();
    let picks = MultiSelect::new()
        .with_prompt("Accessibility adaptations (space to toggle)")
        .items(&labels)
        .defaults(&checked_entries(
            ACCESSIBILITY_OPTIONS,
            &state.accessibility_options,
        ))
        .interact()?;

    let mut patch = WizardPatch::default()
        .with_students_per_class(students)
        .with_number_of_lessons(lessons)
        .with_duration_per_lesson(minutes);
    patch.no_digital_resources = Some(no_digital);
    patch.accessibility_options = Some(picked_ids(
        ACCESSIBILITY_OPTIONS,
        &picks,
        &state.accessibility_options,
    ));
    Ok(patch)
}

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

pub fn prompt_step_action(step: WizardStep) -> Result<StepAction> {
    let mut actions = vec![(format!("Continue to {}", next_title(step)), StepAction::Continue)];
    if step.previous().is_some() {
        actions.push(("< Back".to_string(), StepAction::Back));
    }
    actions.push(("Save draft and quit".to_string(), StepAction::SaveAndQuit));
    actions.push(("Start over".to_string(), StepAction::StartOver));

    let items: Vec<&str> = actions.iter().map(|(label, _)| label.as_str()).collect();
    let selection = Select::new().items(&items).default(0).interact()?;
    Ok(actions[selection].1)
}

fn next_title(step: WizardStep) -> &'static str {
    step.next().map_or("review", |s| s.title())
}

pub fn prompt_review_action() -> Result<ReviewAction> {
    let items = [
        "Generate",
        "Edit a step",
        "Save draft and quit",
        "Start over",
    ];
    let selection = Select::new().items(&items).default(0).interact()?;
    match selection {
        0 => Ok(ReviewAction::Generate),
        1 => {
            let steps: Vec<&WizardStep> = WizardStep::all()
                .iter()
                .filter(|s| !s.is_terminal())
                .collect();
            let titles: Vec<String> = steps
                .iter()
                .map(|s| format!("{}. {}", s.number(), s.title()))
                .collect();
            let pick = Select::new()
                .with_prompt("Which step?")
                .items(&titles)
                .default(0)
                .interact()?;
            Ok(ReviewAction::Edit(*steps[pick]))
        }
        2 => Ok(ReviewAction::SaveAndQuit),
        _ => Ok(ReviewAction::StartOver),
    }
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
