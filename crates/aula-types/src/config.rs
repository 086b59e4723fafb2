//! Global configuration types for Aula.
//!
//! `GlobalConfig` represents the top-level `config.toml` that points the
//! client at the generation service and tunes draft autosave.

use serde::{Deserialize, Serialize};

use crate::wizard::ContentType;

/// Top-level configuration.
///
/// Loaded from `~/.aula/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Base URL of the backend hosting the generation functions.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Public (anon) API key sent alongside the user's access token.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Drafts older than this are discarded on load.
    #[serde(default = "default_draft_ttl_hours")]
    pub draft_ttl_hours: u32,

    /// Quiet period before a pending draft write fires.
    #[serde(default = "default_autosave_debounce_ms")]
    pub autosave_debounce_ms: u64,

    /// HTTP timeout for remote calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Content type offered first by `aula new`.
    #[serde(default)]
    pub default_content_type: ContentType,
}

fn default_api_base_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_draft_ttl_hours() -> u32 {
    24
}

fn default_autosave_debounce_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    180
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: None,
            draft_ttl_hours: default_draft_ttl_hours(),
            autosave_debounce_ms: default_autosave_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            default_content_type: ContentType::default(),
        }
    }
}
