//! Global configuration loader for Aula.
//!
//! Reads `config.toml` from the data directory (`~/.aula/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed, then applies environment overrides.

use std::path::Path;

use aula_types::config::GlobalConfig;
use aula_types::error::ConfigError;

pub const API_URL_VAR: &str = "AULA_API_URL";
pub const API_KEY_VAR: &str = "AULA_API_KEY";

/// Parse and validate a `config.toml` document.
pub fn parse_config(content: &str) -> Result<GlobalConfig, ConfigError> {
    let config: GlobalConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &GlobalConfig) -> Result<(), ConfigError> {
    let url = config.api_base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            field: "api_base_url".to_string(),
            reason: format!("expected an http(s) URL, got '{url}'"),
        });
    }
    Ok(())
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse or validate, logs a warning and
///   returns the default.
/// - Environment overrides are applied in every case.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match parse_config(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
                GlobalConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            GlobalConfig::default()
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            GlobalConfig::default()
        }
    };

    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Override config values from the environment (`AULA_API_URL`,
/// `AULA_API_KEY`). Blank values are ignored.
pub fn apply_env_overrides(
    mut config: GlobalConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> GlobalConfig {
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_blank(API_URL_VAR) {
        config.api_base_url = url.trim().to_string();
    }
    if let Some(key) = non_blank(API_KEY_VAR) {
        config.api_key = Some(key.trim().to_string());
    }
    config
}
