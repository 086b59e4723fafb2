//! Draft management commands: list, clear.

use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use aula_types::wizard::{ContentType, DraftSummary, WizardStep};

use crate::state::AppState;

/// List live drafts, most recently saved first.
pub async fn list_drafts(state: &AppState, json: bool) -> Result<()> {
    let drafts = state.drafts.list_drafts().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&drafts)?);
        return Ok(());
    }

    if drafts.is_empty() {
        println!();
        println!("  No saved drafts. Start a new request with: aula new");
        println!();
        return Ok(());
    }

    let now = Utc::now();
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Type").fg(Color::White),
        Cell::new("Topic").fg(Color::White),
        Cell::new("Step").fg(Color::White),
        Cell::new("Saved").fg(Color::White),
    ]);

    for draft in &drafts {
        table.add_row(vec![
            Cell::new(draft.content_type.label()).fg(Color::Cyan),
            Cell::new(topic_display(draft)),
            Cell::new(format!(
                "{}/{} {}",
                draft.current_step.number(),
                WizardStep::total(),
                draft.current_step.title()
            )),
            Cell::new(format_age(draft.saved_at, now)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} draft{}. Drafts expire {}h after their last save.",
        style(drafts.len()).bold(),
        if drafts.len() == 1 { "" } else { "s" },
        state.config.draft_ttl_hours
    );
    println!();

    Ok(())
}

/// Delete the draft of one content type, or all of them.
pub async fn clear_drafts(
    state: &AppState,
    content_type: Option<ContentType>,
    force: bool,
    json: bool,
) -> Result<()> {
    let targets: Vec<ContentType> = match content_type {
        Some(ct) => vec![ct],
        None => ContentType::all().to_vec(),
    };

    if !force && !json {
        let what = match content_type {
            Some(ct) => format!("the saved {} draft", ct.label().to_lowercase()),
            None => "all saved drafts".to_string(),
        };
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {}?", style(what).red().bold()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    for ct in &targets {
        state.drafts.discard(*ct).await;
    }

    if json {
        let cleared: Vec<&str> = targets.iter().map(|ct| ct.as_str()).collect();
        println!("{}", serde_json::json!({ "cleared": cleared }));
    } else {
        println!();
        println!("  {} Drafts cleared.", style("✓").green().bold());
        println!();
    }

    Ok(())
}

fn topic_display(draft: &DraftSummary) -> String {
    let topic = draft.topic.trim();
    if topic.is_empty() {
        return "(no topic yet)".to_string();
    }
    if topic.chars().count() > 40 {
        let clipped: String = topic.chars().take(37).collect();
        format!("{clipped}...")
    } else {
        topic.to_string()
    }
}

/// Coarse "N minutes ago" style age.
fn format_age(saved_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - saved_at).num_minutes().max(0);
    match minutes {
        0 => "just now".to_string(),
        1..=59 => format!("{minutes}m ago"),
        60..=1439 => format!("{}h ago", minutes / 60),
        _ => format!("{}d ago", minutes / 1440),
    }
}
