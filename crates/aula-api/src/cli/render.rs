//! Terminal rendering helpers for the wizard.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use termimad::MadSkin;

use aula_core::wizard::session::Progress;
use aula_types::generation::GenerationFailure;
use aula_types::wizard::WizardStep;

const PROGRESS_WIDTH: usize = 20;

/// Render generated markdown for the terminal.
pub fn render_markdown(markdown: &str) -> String {
    let mut skin = MadSkin::default_dark();
    skin.inline_code
        .set_fg(termimad::crossterm::style::Color::Yellow);
    skin.term_text(markdown).to_string()
}

/// `[#######-------------]` for `percent`.
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Title line shown above each step.
pub fn step_header(step: WizardStep, progress: Progress) -> String {
    format!(
        "Step {}/{}  {}  {} {}%",
        step.number(),
        WizardStep::total(),
        step.title(),
        progress_bar(progress.percent(), PROGRESS_WIDTH),
        progress.percent()
    )
}

pub fn print_step_header(step: WizardStep, progress: Progress) {
    println!();
    println!("  {}", style(step_header(step, progress)).cyan().bold());
    println!("  {}", style(step.description()).dim());
    println!();
}

/// Steadily ticking spinner; call `finish_and_clear` when done.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

pub fn print_errors(errors: &[String]) {
    println!();
    for error in errors {
        println!("  {} {}", style("✗").red().bold(), error);
    }
    println!();
}

/// What the user can do about a failure, beyond retrying.
pub fn failure_hint(failure: &GenerationFailure) -> Option<&'static str> {
    match failure {
        GenerationFailure::SessionExpired => {
            Some("Store a fresh token with `aula auth set-token`, then generate again.")
        }
        GenerationFailure::QuotaExceeded { .. } => {
            Some("Your answers are saved as a draft. Upgrade your plan, then run `aula resume`.")
        }
        GenerationFailure::InFlight => None,
        _ if failure.is_retryable() => Some("Your answers are kept; you can try again."),
        _ => None,
    }
}

pub fn print_failure(failure: &GenerationFailure) {
    println!();
    println!("  {} {}", style("✗").red().bold(), failure.user_message());
    if let Some(hint) = failure_hint(failure) {
        println!("    {}", style(hint).dim());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0, 10), "[----------]");
        assert_eq!(progress_bar(40, 10), "[####------]");
        assert_eq!(progress_bar(100, 10), "[##########]");
        assert_eq!(progress_bar(250, 10), "[##########]");
    }

    #[test]
    fn test_step_header() {
        let header = step_header(
            WizardStep::Objectives,
            Progress {
                completed: 2,
                total: 5,
            },
        );
        assert!(header.starts_with("Step 2/5  Objectives"));
        assert!(header.ends_with("40%"));
    }

    #[test]
    fn test_failure_hints() {
        assert!(
            failure_hint(&GenerationFailure::SessionExpired)
                .unwrap()
                .contains("auth set-token")
        );
        assert!(failure_hint(&GenerationFailure::EmptyResult).is_some());
        assert!(failure_hint(&GenerationFailure::InFlight).is_none());
    }

    #[test]
    fn test_render_markdown_keeps_text() {
        let rendered = render_markdown("# Fractions\n\nCompare *halves* and thirds.");
        assert!(rendered.contains("Fractions"));
        assert!(rendered.contains("thirds"));
    }
}
