//! DraftPersistenceManager -- best-effort mirror of the wizard into storage.
//!
//! Drafts are stored as a JSON [`PersistedDraft`] envelope under a key derived
//! from the content type. A draft is only returned while it is younger than
//! the TTL (24 hours by default); expired or unparseable drafts are deleted
//! and the caller gets defaults instead. Persistence failures are logged and
//! swallowed: losing a draft is an inconvenience, not an error.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use aula_types::config::GlobalConfig;
use aula_types::error::RepositoryError;
use aula_types::wizard::{ContentType, DraftSummary, PersistedDraft, WizardPatch, WizardState};

use super::storage::DraftStorage;
use crate::wizard::store::apply_patch;

/// Default draft lifetime.
pub const DEFAULT_DRAFT_TTL_HOURS: u32 = 24;

/// Default autosave quiet period.
pub const DEFAULT_AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Minimum accepted TTL (safety floor for misconfiguration).
const MIN_DRAFT_TTL_HOURS: u32 = 1;

/// Minimum accepted debounce window.
const MIN_AUTOSAVE_DEBOUNCE_MS: u64 = 50;

/// State returned by [`DraftPersistenceManager::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredState {
    pub state: WizardState,
    /// Save time of the draft the state came from; `None` means defaults.
    pub restored_from: Option<DateTime<Utc>>,
}

pub struct DraftPersistenceManager<S> {
    storage: S,
    ttl: chrono::Duration,
    debounce: Duration,
}

impl<S: DraftStorage> DraftPersistenceManager<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            ttl: chrono::Duration::hours(i64::from(DEFAULT_DRAFT_TTL_HOURS)),
            debounce: DEFAULT_AUTOSAVE_DEBOUNCE,
        }
    }

    /// Build a manager with TTL and debounce taken from config (floors applied).
    pub fn from_config(storage: S, config: &GlobalConfig) -> Self {
        Self::new(storage)
            .with_ttl_hours(config.draft_ttl_hours)
            .with_debounce(Duration::from_millis(config.autosave_debounce_ms))
    }

    pub fn with_ttl_hours(mut self, hours: u32) -> Self {
        self.ttl = chrono::Duration::hours(i64::from(hours.max(MIN_DRAFT_TTL_HOURS)));
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce.max(Duration::from_millis(MIN_AUTOSAVE_DEBOUNCE_MS));
        self
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The state a wizard for `content_type` should open with.
    ///
    /// A live draft wins; otherwise defaults merged with `prefill`.
    pub async fn load(&self, content_type: ContentType, prefill: &WizardPatch) -> WizardState {
        self.restore(content_type, prefill).await.state
    }

    /// Like [`load`](Self::load), also reporting where the state came from.
    pub async fn restore(&self, content_type: ContentType, prefill: &WizardPatch) -> RestoredState {
        match self.load_draft(content_type).await {
            Some(draft) => RestoredState {
                restored_from: Utc.timestamp_millis_opt(draft.timestamp).single(),
                state: draft.state,
            },
            None => {
                let mut state = WizardState::new(content_type);
                apply_patch(&mut state, prefill.clone());
                RestoredState {
                    state,
                    restored_from: None,
                }
            }
        }
    }

    /// Read the live draft for `content_type`, deleting it if it is corrupt
    /// or expired.
    pub async fn load_draft(&self, content_type: ContentType) -> Option<PersistedDraft> {
        let key = content_type.draft_key();

        let raw = match self.storage.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(%key, error = %e, "Failed to read draft, starting fresh");
                return None;
            }
        };

        let draft = match serde_json::from_str::<PersistedDraft>(&raw) {
            Ok(draft) if draft.content_type == content_type.as_str() => draft,
            Ok(draft) => {
                warn!(
                    %key,
                    stored = %draft.content_type,
                    "Draft content type does not match its key, discarding"
                );
                self.remove_quietly(&key).await;
                return None;
            }
            Err(e) => {
                warn!(%key, error = %e, "Corrupt draft, discarding");
                self.remove_quietly(&key).await;
                return None;
            }
        };

        if self.is_expired(draft.timestamp, Utc::now()) {
            debug!(%key, timestamp = draft.timestamp, "Draft expired, discarding");
            self.remove_quietly(&key).await;
            return None;
        }

        Some(draft)
    }

    /// Write `state` as the draft for its content type. Failures are logged.
    pub async fn save(&self, state: &WizardState) {
        if let Err(e) = self.try_save(state).await {
            warn!(
                content_type = %state.content_type,
                error = %e,
                "Failed to save draft"
            );
        }
    }

    /// Write `state`, reporting failures to the caller.
    pub async fn try_save(&self, state: &WizardState) -> Result<(), RepositoryError> {
        let draft = PersistedDraft {
            state: state.clone(),
            timestamp: Utc::now().timestamp_millis(),
            content_type: state.content_type.as_str().to_string(),
        };
        let json = serde_json::to_string(&draft)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize draft: {e}")))?;

        self.storage.set(&state.content_type.draft_key(), &json).await?;
        debug!(content_type = %state.content_type, step = state.current_step.number(), "Draft saved");
        Ok(())
    }

    /// Delete the draft for `content_type`. Failures are logged.
    pub async fn discard(&self, content_type: ContentType) {
        self.remove_quietly(&content_type.draft_key()).await;
    }

    /// Summaries of every live draft, most recently saved first.
    pub async fn list_drafts(&self) -> Vec<DraftSummary> {
        let mut summaries = Vec::new();
        for content_type in ContentType::all() {
            if let Some(draft) = self.load_draft(*content_type).await {
                let Some(saved_at) = Utc.timestamp_millis_opt(draft.timestamp).single() else {
                    continue;
                };
                summaries.push(DraftSummary {
                    content_type: *content_type,
                    topic: draft.state.topic.clone(),
                    current_step: draft.state.current_step,
                    saved_at,
                });
            }
        }
        summaries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        summaries
    }

    fn is_expired(&self, timestamp_ms: i64, now: DateTime<Utc>) -> bool {
        now.timestamp_millis().saturating_sub(timestamp_ms) >= self.ttl.num_milliseconds()
    }

    async fn remove_quietly(&self, key: &str) {
        if let Err(e) = self.storage.remove(key).await {
            warn!(%key, error = %e, "Failed to delete draft");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::storage::MemoryDraftStorage;
    use aula_types::wizard::WizardStep;

    /// Storage that fails every operation.
    struct BrokenStorage;

    impl DraftStorage for BrokenStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, RepositoryError> {
            Err(RepositoryError::Connection)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), RepositoryError> {
            Err(RepositoryError::Query("quota exceeded".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<(), RepositoryError> {
            Err(RepositoryError::Connection)
        }
    }

    fn answered(content_type: ContentType) -> WizardState {
        let mut state = WizardState::new(content_type);
        state.current_step = WizardStep::Strategy;
        state.grade = "4th grade".to_string();
        state.subject = "Science".to_string();
        state.topic = "The water cycle".to_string();
        state.methodologies = vec!["inquiry_based".to_string()];
        state
    }

    async fn write_envelope(storage: &MemoryDraftStorage, state: &WizardState, age: chrono::Duration) {
        let draft = PersistedDraft {
            state: state.clone(),
            timestamp: (Utc::now() - age).timestamp_millis(),
            content_type: state.content_type.as_str().to_string(),
        };
        storage
            .set(
                &state.content_type.draft_key(),
                &serde_json::to_string(&draft).unwrap(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let manager = DraftPersistenceManager::new(MemoryDraftStorage::new());
        let state = answered(ContentType::LessonPlan);

        manager.save(&state).await;
        let loaded = manager.load(ContentType::LessonPlan, &WizardPatch::default()).await;
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let storage = MemoryDraftStorage::new();
        let manager = DraftPersistenceManager::new(storage.clone());
        manager.save(&answered(ContentType::Activity)).await;

        let raw = storage.get("wizard_draft_activity").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["contentType"], "activity");
        assert!(value["timestamp"].is_i64());
        assert_eq!(value["state"]["topic"], "The water cycle");
    }

    #[tokio::test]
    async fn test_missing_draft_returns_defaults_with_prefill() {
        let manager = DraftPersistenceManager::new(MemoryDraftStorage::new());
        let prefill = WizardPatch::default().with_topic("Renewable energy");

        let restored = manager.restore(ContentType::Assessment, &prefill).await;
        assert!(restored.restored_from.is_none());
        assert_eq!(restored.state.content_type, ContentType::Assessment);
        assert_eq!(restored.state.topic, "Renewable energy");
        assert_eq!(restored.state.current_step, WizardStep::Context);
    }

    #[tokio::test]
    async fn test_live_draft_wins_over_prefill() {
        let storage = MemoryDraftStorage::new();
        let manager = DraftPersistenceManager::new(storage.clone());
        let state = answered(ContentType::LessonPlan);
        write_envelope(&storage, &state, chrono::Duration::hours(23)).await;

        let restored = manager
            .restore(ContentType::LessonPlan, &WizardPatch::default().with_topic("Other"))
            .await;
        assert_eq!(restored.state, state);
        assert!(restored.restored_from.is_some());
    }

    #[tokio::test]
    async fn test_expired_draft_is_removed_and_ignored() {
        let storage = MemoryDraftStorage::new();
        let manager = DraftPersistenceManager::new(storage.clone());
        let state = answered(ContentType::LessonPlan);
        write_envelope(&storage, &state, chrono::Duration::hours(24)).await;

        let loaded = manager.load(ContentType::LessonPlan, &WizardPatch::default()).await;
        assert_eq!(loaded, WizardState::new(ContentType::LessonPlan));
        assert!(storage.get("wizard_draft_lesson_plan").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_custom_ttl() {
        let storage = MemoryDraftStorage::new();
        let manager = DraftPersistenceManager::new(storage.clone()).with_ttl_hours(2);
        let state = answered(ContentType::Activity);
        write_envelope(&storage, &state, chrono::Duration::hours(3)).await;

        assert!(manager.load_draft(ContentType::Activity).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_draft_is_removed() {
        let storage = MemoryDraftStorage::new();
        storage.set("wizard_draft_activity", "{not json").await.unwrap();
        let manager = DraftPersistenceManager::new(storage.clone());

        let loaded = manager.load(ContentType::Activity, &WizardPatch::default()).await;
        assert_eq!(loaded, WizardState::new(ContentType::Activity));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_mismatched_content_type_is_removed() {
        let storage = MemoryDraftStorage::new();
        let state = answered(ContentType::Assessment);
        let draft = PersistedDraft {
            state,
            timestamp: Utc::now().timestamp_millis(),
            content_type: "assessment".to_string(),
        };
        storage
            .set("wizard_draft_activity", &serde_json::to_string(&draft).unwrap())
            .await
            .unwrap();
        let manager = DraftPersistenceManager::new(storage.clone());

        assert!(manager.load_draft(ContentType::Activity).await.is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_drafts_for_different_types_do_not_collide() {
        let manager = DraftPersistenceManager::new(MemoryDraftStorage::new());
        let mut plan = answered(ContentType::LessonPlan);
        plan.topic = "Plan topic".to_string();
        let mut quiz = answered(ContentType::Assessment);
        quiz.topic = "Quiz topic".to_string();

        manager.save(&plan).await;
        manager.save(&quiz).await;

        let none = WizardPatch::default();
        assert_eq!(manager.load(ContentType::LessonPlan, &none).await.topic, "Plan topic");
        assert_eq!(manager.load(ContentType::Assessment, &none).await.topic, "Quiz topic");
        assert_eq!(manager.list_drafts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_storage_failures_are_swallowed() {
        let manager = DraftPersistenceManager::new(BrokenStorage);
        let state = answered(ContentType::LessonPlan);

        manager.save(&state).await;
        manager.discard(ContentType::LessonPlan).await;
        assert!(manager.try_save(&state).await.is_err());

        let loaded = manager.load(ContentType::LessonPlan, &WizardPatch::default()).await;
        assert_eq!(loaded, WizardState::new(ContentType::LessonPlan));
    }

    #[tokio::test]
    async fn test_discard_removes_draft() {
        let storage = MemoryDraftStorage::new();
        let manager = DraftPersistenceManager::new(storage.clone());
        manager.save(&answered(ContentType::LessonPlan)).await;
        manager.discard(ContentType::LessonPlan).await;
        assert!(storage.is_empty());
    }

    #[test]
    fn test_config_floors_are_enforced() {
        let config = GlobalConfig {
            draft_ttl_hours: 0,
            autosave_debounce_ms: 1,
            ..GlobalConfig::default()
        };
        let manager = DraftPersistenceManager::from_config(MemoryDraftStorage::new(), &config);
        assert_eq!(manager.ttl(), chrono::Duration::hours(1));
        assert_eq!(manager.debounce(), Duration::from_millis(50));
    }
}
