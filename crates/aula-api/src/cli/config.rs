//! `aula config show`.

use anyhow::Result;
use console::style;

use aula_infra::filesystem::config_path;
use aula_types::config::GlobalConfig;

use super::auth::mask_secret;
use crate::state::AppState;

/// The effective configuration with the API key masked.
fn redacted(config: &GlobalConfig) -> GlobalConfig {
    let mut config = config.clone();
    config.api_key = config.api_key.as_deref().map(mask_secret);
    config
}

pub async fn show_config(state: &AppState, json: bool) -> Result<()> {
    let config = redacted(&state.config);
    let path = config_path(&state.data_dir);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "data_dir": state.data_dir,
                "config_file": path,
                "config": config,
            }))?
        );
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Data dir:").bold(), state.data_dir.display());
    println!(
        "  {} {}{}",
        style("Config:").bold(),
        path.display(),
        if path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!();
    for line in toml::to_string_pretty(&config)?.lines() {
        println!("    {line}");
    }
    println!();

    Ok(())
}
