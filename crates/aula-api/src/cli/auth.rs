//! Session CLI commands: set-token, clear, status.
//!
//! The wizard never signs in by itself. These commands manage the token the
//! generation calls are authorized with.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use dialoguer::Password;

use aula_infra::session::env::ACCESS_TOKEN_VAR;
use aula_types::error::RepositoryError;

use crate::state::AppState;

/// Show only the last four characters of a secret.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}

fn parse_expiry(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid --expires-at '{raw}', expected RFC 3339"))
}

/// Store an access token in the OS keychain.
///
/// # Examples
///
/// ```bash
/// # Secure prompt (recommended)
/// aula auth set-token
///
/// # Script/automation mode
/// aula auth set-token --token eyJ... --expires-at 2026-11-01T12:00:00Z
/// ```
pub async fn set_token(
    state: &AppState,
    token: Option<String>,
    expires_at: Option<String>,
    json: bool,
) -> Result<()> {
    let expires_at = expires_at.as_deref().map(parse_expiry).transpose()?;

    let token = match token {
        Some(t) => t,
        None => Password::new().with_prompt("Access token").interact()?,
    };
    if token.trim().is_empty() {
        anyhow::bail!("Access token must not be empty");
    }

    state
        .keychain
        .store_token(&token, expires_at)
        .context("Failed to store token in the OS keychain")?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "stored": true,
                "masked": mask_secret(token.trim()),
                "expires_at": expires_at,
            })
        );
    } else {
        println!(
            "  {} Token stored ({})",
            style("✓").green().bold(),
            mask_secret(token.trim())
        );
    }

    Ok(())
}

/// Remove the stored token.
pub async fn clear_token(state: &AppState, json: bool) -> Result<()> {
    let removed = match state.keychain.clear() {
        Ok(()) => true,
        Err(RepositoryError::NotFound) => false,
        Err(e) => return Err(e).context("Failed to clear the keychain entry"),
    };

    if json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else if removed {
        println!("  {} Token removed.", style("✓").green().bold());
    } else {
        println!("  No stored token.");
    }

    Ok(())
}

/// Report whether generation calls would be authorized right now.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let session = state.usable_session().await;
    let from_env = std::env::var(ACCESS_TOKEN_VAR).is_ok_and(|v| !v.trim().is_empty());

    if json {
        println!(
            "{}",
            serde_json::json!({
                "signed_in": session.is_some(),
                "expires_at": session.as_ref().and_then(|s| s.expires_at),
                "env_override": from_env,
            })
        );
        return Ok(());
    }

    println!();
    match session {
        Some(session) => {
            let expiry = session.expires_at.map_or_else(
                || "no expiry recorded".to_string(),
                |at| format!("expires {}", at.format("%Y-%m-%d %H:%M UTC")),
            );
            println!("  {} Signed in ({expiry})", style("●").green().bold());
        }
        None => {
            println!("  {} No usable session", style("○").yellow().bold());
            println!(
                "    Store one with: {}",
                style("aula auth set-token").yellow()
            );
        }
    }
    if from_env {
        println!(
            "    {}",
            style(format!("{ACCESS_TOKEN_VAR} is set and takes priority over the keychain")).dim()
        );
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abc"), "****");
        assert_eq!(mask_secret("eyJhbGciOiJIUzI1NiJ9"), "****NiJ9");
    }

    #[test]
    fn test_parse_expiry() {
        let at = parse_expiry("2026-11-01T12:00:00-03:00").unwrap();
        assert_eq!(at.to_rfc3339(), "2026-11-01T15:00:00+00:00");
        assert!(parse_expiry("tomorrow").is_err());
    }
}
