//! Application state wiring all services together.
//!
//! Core components are generic over their ports; AppState pins them to the
//! concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use aula_core::auth::{AuthSession, SessionProvider};
use aula_core::draft::persistence::DraftPersistenceManager;
use aula_core::generation::orchestrator::GenerationOrchestrator;
use aula_infra::config::load_global_config;
use aula_infra::filesystem::resolve_data_dir;
use aula_infra::remote::RemoteEndpoint;
use aula_infra::remote::classes::HttpClassDirectory;
use aula_infra::remote::generation::HttpGenerationClient;
use aula_infra::remote::skills::HttpSkillSuggester;
use aula_infra::session::SessionChain;
use aula_infra::session::keychain::KeychainSessionProvider;
use aula_infra::sqlite::draft_slot::SqliteDraftStorage;
use aula_infra::sqlite::pool::DatabasePool;
use aula_types::config::GlobalConfig;
use chrono::Utc;

/// Concrete type aliases for the generics pinned to infra implementations.
pub type ConcreteDraftManager = DraftPersistenceManager<SqliteDraftStorage>;

pub type ConcreteOrchestrator = GenerationOrchestrator<HttpGenerationClient, SessionChain>;

/// Shared application state for CLI commands.
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: GlobalConfig,
    pub drafts: Arc<ConcreteDraftManager>,
    pub orchestrator: ConcreteOrchestrator,
    pub classes: HttpClassDirectory,
    pub skills: HttpSkillSuggester,
    pub keychain: KeychainSessionProvider,
}

impl AppState {
    /// Initialize the application state: load config, open the DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;

        let pool = DatabasePool::open_in(&data_dir)
            .await
            .context("Failed to open draft database")?;
        let drafts = DraftPersistenceManager::from_config(SqliteDraftStorage::new(pool), &config);

        let endpoint =
            RemoteEndpoint::from_config(&config).context("Failed to create HTTP client")?;
        let orchestrator = GenerationOrchestrator::new(
            HttpGenerationClient::new(endpoint.clone()),
            SessionChain::standard(),
        );

        Ok(Self {
            data_dir,
            config,
            drafts: Arc::new(drafts),
            orchestrator,
            classes: HttpClassDirectory::new(endpoint.clone()),
            skills: HttpSkillSuggester::new(endpoint),
            keychain: KeychainSessionProvider::new(),
        })
    }

    /// The current session if it is usable right now.
    ///
    /// Directory lookups are optional, so failures here are logged and
    /// reported as "no session".
    pub async fn usable_session(&self) -> Option<AuthSession> {
        match self.orchestrator.sessions().current_session().await {
            Ok(Some(session)) if session.is_valid_at(Utc::now()) => Some(session),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session");
                None
            }
        }
    }
}
