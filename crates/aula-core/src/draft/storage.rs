//! Durable key/value slot for wizard drafts.
//!
//! Values are opaque strings (the JSON-encoded draft envelope); keys come
//! from [`ContentType::draft_key`](aula_types::wizard::ContentType::draft_key).
//! Implementations live in aula-infra, plus the in-memory one below for
//! sessions that should not outlive the process.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use aula_types::error::RepositoryError;

/// Persistence interface for draft slots.
///
/// Uses RPITIT (return position `impl Trait` in traits) consistent with
/// all async traits in this project.
pub trait DraftStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Write `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Empty the slot. No-op if it is already empty.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Process-local draft slots. Cloning shares the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryDraftStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().expect("draft slots lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DraftStorage for MemoryDraftStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self
            .slots
            .lock()
            .expect("draft slots lock poisoned")
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.slots
            .lock()
            .expect("draft slots lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        self.slots
            .lock()
            .expect("draft slots lock poisoned")
            .remove(key);
        Ok(())
    }
}
