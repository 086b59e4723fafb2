//! The interactive request wizard (`aula new`, `aula resume`).
//!
//! Walks the five steps with dialoguer prompts. All state changes go through
//! the [`WizardSession`]; autosave runs in the background while the user
//! types, and "Save draft and quit" flushes it immediately.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use console::style;
use dialoguer::Select;
use tracing::warn;

use aula_core::directory::{ClassDirectory, SkillQuery, SkillSuggester};
use aula_core::draft::storage::DraftStorage;
use aula_core::wizard::navigation::NextOutcome;
use aula_core::wizard::session::{SessionPhase, WizardSession};
use aula_infra::sqlite::draft_slot::SqliteDraftStorage;
use aula_types::error::WizardError;
use aula_types::generation::{GenerationFailure, GenerationResult};
use aula_types::wizard::{
    BnccSkill, ClassSummary, ContentType, WizardPatch, WizardState, WizardStep,
};

use super::prompts::{self, ContextAnswer, ReviewAction, StepAction};
use super::render;
use crate::state::AppState;

type Session = WizardSession<SqliteDraftStorage>;

/// Whether the wizard loop keeps going.
enum Flow {
    Continue,
    Done,
}

/// Start a request of `content_type`; resumes a live draft of that type.
pub async fn run_new(
    state: &AppState,
    content_type: Option<ContentType>,
    topic: Option<String>,
    json: bool,
) -> Result<()> {
    let content_type = content_type.unwrap_or(state.config.default_content_type);
    let mut prefill = WizardPatch::default();
    if let Some(topic) = topic {
        prefill = prefill.with_topic(topic);
    }

    let session = WizardSession::open(Arc::clone(&state.drafts), content_type, &prefill).await;
    drive(state, session, json).await
}

/// Continue a saved draft, asking which one when no type is given.
pub async fn run_resume(
    state: &AppState,
    content_type: Option<ContentType>,
    json: bool,
) -> Result<()> {
    let content_type = match content_type {
        Some(content_type) => {
            if state.drafts.load_draft(content_type).await.is_none() {
                println!();
                println!(
                    "  No saved {} draft. Starting a new one.",
                    content_type.label().to_lowercase()
                );
            }
            content_type
        }
        None => {
            let drafts = state.drafts.list_drafts().await;
            if drafts.is_empty() {
                println!();
                println!("  No saved drafts found. Start a new request with: aula new");
                println!();
                return Ok(());
            }

            let items: Vec<String> = drafts
                .iter()
                .map(|d| {
                    let topic = if d.topic.trim().is_empty() {
                        "(no topic yet)"
                    } else {
                        d.topic.as_str()
                    };
                    format!(
                        "{} -- {}, step {}/{}, saved {}",
                        d.content_type.label(),
                        topic,
                        d.current_step.number(),
                        WizardStep::total(),
                        d.saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    )
                })
                .collect();

            println!();
            println!("  {} Saved drafts:", style("*").cyan().bold());
            println!();

            let selection = Select::new().items(&items).default(0).interact()?;
            drafts[selection].content_type
        }
    };

    let session =
        WizardSession::open(Arc::clone(&state.drafts), content_type, &WizardPatch::default())
            .await;
    drive(state, session, json).await
}

/// Run the step loop, keeping the answers if anything goes wrong.
async fn drive(state: &AppState, session: Session, json: bool) -> Result<()> {
    if let Some(saved_at) = session.restored_from() {
        println!();
        println!(
            "  {} Resuming your {} draft from {}",
            style("*").cyan().bold(),
            session.store().content_type().label().to_lowercase(),
            saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }

    let outcome = run_steps(state, &session, json).await;

    if outcome.is_err() && session.phase() == SessionPhase::Editing {
        keep_draft(&session).await;
    }
    session.close().await;
    outcome
}

async fn run_steps(state: &AppState, session: &Session, json: bool) -> Result<()> {
    loop {
        let step = session.navigation().current_step();
        render::print_step_header(step, session.progress());

        if step.is_terminal() {
            match review(state, session, json).await? {
                Flow::Continue => continue,
                Flow::Done => return Ok(()),
            }
        }

        ask_step(state, session, step).await?;

        match prompts::prompt_step_action(step)? {
            StepAction::Continue => {
                if let NextOutcome::Blocked(validation) = session.next()? {
                    render::print_errors(&validation.errors);
                }
            }
            StepAction::Back => {
                session.back()?;
            }
            StepAction::SaveAndQuit => {
                save_and_quit(session).await?;
                return Ok(());
            }
            StepAction::StartOver => start_over(session).await?,
        }
    }
}

async fn ask_step(state: &AppState, session: &Session, step: WizardStep) -> Result<()> {
    let current = session.state();
    match step {
        WizardStep::Context => {
            let classes = load_classes(state).await;
            match prompts::prompt_context(&current, &classes)? {
                ContextAnswer::Linked(class) => {
                    session.link_class(&class)?;
                }
                ContextAnswer::Manual { grade, subject } => {
                    if current.has_linked_class() {
                        session.unlink_class()?;
                    }
                    session.update_state(
                        WizardPatch::default()
                            .with_grade(grade)
                            .with_subject(subject),
                    )?;
                }
            }
        }
        WizardStep::Objectives => {
            let topic = prompts::prompt_topic(&current)?;
            let current = session.update_state(WizardPatch::default().with_topic(topic))?;
            let suggestions = suggest_skills(state, &current).await;
            let skills = prompts::prompt_skills(&current.bncc_skills, suggestions)?;
            session.update_state(WizardPatch {
                bncc_skills: Some(skills),
                ..Default::default()
            })?;
        }
        WizardStep::Strategy => {
            session.update_state(prompts::prompt_strategy(&current)?)?;
        }
        WizardStep::Configuration => {
            session.update_state(prompts::prompt_configuration(&current)?)?;
        }
        WizardStep::Review => {}
    }
    Ok(())
}

async fn review(state: &AppState, session: &Session, json: bool) -> Result<Flow> {
    let current = session.state();
    print_summary(&current);

    let validation = session.navigation().current_validation();
    if !validation.is_valid {
        render::print_errors(&validation.errors);
    }

    match prompts::prompt_review_action()? {
        ReviewAction::Generate => generate(state, session, &current, json).await,
        ReviewAction::Edit(step) => {
            session.go_to_step(i64::from(step.number()))?;
            Ok(Flow::Continue)
        }
        ReviewAction::SaveAndQuit => {
            save_and_quit(session).await?;
            Ok(Flow::Done)
        }
        ReviewAction::StartOver => {
            start_over(session).await?;
            Ok(Flow::Continue)
        }
    }
}

async fn generate(
    state: &AppState,
    session: &Session,
    current: &WizardState,
    json: bool,
) -> Result<Flow> {
    let spinner = render::spinner(format!(
        "Generating your {}...",
        current.content_type.label().to_lowercase()
    ));
    let result = session.submit(&state.orchestrator).await;
    spinner.finish_and_clear();

    match result {
        Ok(GenerationResult::Success { content }) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&GenerationResult::Success { content })?
                );
            } else {
                println!();
                println!("{}", render::render_markdown(&content));
                println!(
                    "  {} {} ready.",
                    style("✓").green().bold(),
                    current.content_type.label()
                );
                println!();
            }
            Ok(Flow::Done)
        }
        Ok(GenerationResult::Failure(failure)) => {
            render::print_failure(&failure);
            if matches!(failure, GenerationFailure::SessionExpired) {
                keep_draft(session).await;
            }
            Ok(Flow::Continue)
        }
        Err(WizardError::Blocked { errors, .. }) => {
            render::print_errors(&errors);
            Ok(Flow::Continue)
        }
        Err(e) => Err(e.into()),
    }
}

/// Write the draft now; a storage failure is logged and the wizard goes on.
async fn keep_draft<S: DraftStorage + 'static>(session: &WizardSession<S>) {
    if let Err(e) = session.flush().await {
        warn!(session_id = %session.id(), error = %e, "Failed to save draft");
    }
}

async fn save_and_quit(session: &Session) -> Result<()> {
    session.flush().await.context("Failed to save draft")?;
    println!();
    println!(
        "  {} Draft saved. Continue later with: aula resume {}",
        style("✓").green().bold(),
        session.store().content_type()
    );
    println!();
    Ok(())
}

async fn start_over(session: &Session) -> Result<()> {
    if prompts::confirm("Discard all answers and start over?", false)? {
        session.reset_wizard().await;
    }
    Ok(())
}

fn print_summary(state: &WizardState) {
    for (label, value) in state.summary_lines() {
        println!("  {:<18} {}", style(label).bold(), value);
    }
    println!();
}

/// The user's classes, or none when signed out or unreachable.
async fn load_classes(state: &AppState) -> Vec<ClassSummary> {
    let Some(auth) = state.usable_session().await else {
        return Vec::new();
    };

    let spinner = render::spinner("Loading your classes...");
    let classes = state.classes.list_classes(&auth).await;
    spinner.finish_and_clear();

    classes.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load classes");
        Vec::new()
    })
}

/// Skill suggestions for the current topic; empty when unavailable.
async fn suggest_skills(state: &AppState, current: &WizardState) -> Vec<BnccSkill> {
    let Some(query) = SkillQuery::from_state(current) else {
        return Vec::new();
    };
    let Some(auth) = state.usable_session().await else {
        return Vec::new();
    };

    let spinner = render::spinner("Looking up BNCC skills...");
    let skills = state.skills.suggest_skills(&auth, &query).await;
    spinner.finish_and_clear();

    skills.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to suggest skills");
        Vec::new()
    })
}
