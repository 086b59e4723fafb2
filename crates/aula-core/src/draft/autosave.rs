//! Debounced draft autosave.
//!
//! [`spawn_autosave`] starts one background task per wizard session. The task
//! waits for store mutations, then for a quiet period; every mutation inside
//! the window restarts it, so a burst of keystrokes produces one write. The
//! write reads the store when the timer fires, so it always carries the
//! latest state. A reset abandons the pending write.
//!
//! The returned [`AutosaveHandle`] owns the task: cancelling or dropping it
//! stops the task and discards any write that has not fired yet.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::persistence::DraftPersistenceManager;
use super::storage::DraftStorage;
use crate::wizard::store::{StoreChange, WizardStore};

/// Owner of the autosave task. Dropping it cancels the task.
pub struct AutosaveHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AutosaveHandle {
    /// Stop the task; a pending write is discarded.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// How a debounce window ended.
enum Window {
    /// Quiet period elapsed; write now.
    Fire,
    /// The store was reset; drop the pending write.
    Abandon,
    /// Cancelled or the store went away.
    Shutdown,
}

/// Start autosaving `store` through `manager`.
///
/// Subscribes before returning, so no mutation made after this call is missed.
pub fn spawn_autosave<S>(
    manager: Arc<DraftPersistenceManager<S>>,
    store: WizardStore,
) -> AutosaveHandle
where
    S: DraftStorage + 'static,
{
    let cancel = CancellationToken::new();
    let changes = store.subscribe();
    let debounce = manager.debounce();

    let task = tokio::spawn(run(manager, store, changes, debounce, cancel.clone()));

    AutosaveHandle {
        cancel,
        task: Some(task),
    }
}

async fn run<S: DraftStorage>(
    manager: Arc<DraftPersistenceManager<S>>,
    store: WizardStore,
    mut changes: watch::Receiver<StoreChange>,
    debounce: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        if *changes.borrow_and_update() == StoreChange::Reset {
            continue;
        }

        match wait_for_quiet(&mut changes, debounce, &cancel).await {
            Window::Fire => {
                let snapshot = store.snapshot();
                manager.save(&snapshot).await;
            }
            Window::Abandon => debug!("Wizard reset, pending draft write dropped"),
            Window::Shutdown => break,
        }
    }

    debug!("Autosave stopped");
}

async fn wait_for_quiet(
    changes: &mut watch::Receiver<StoreChange>,
    debounce: Duration,
    cancel: &CancellationToken,
) -> Window {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Window::Shutdown,
            changed = changes.changed() => {
                if changed.is_err() {
                    return Window::Shutdown;
                }
                if *changes.borrow_and_update() == StoreChange::Reset {
                    return Window::Abandon;
                }
                // another mutation: restart the quiet period
            }
            () = tokio::time::sleep(debounce) => return Window::Fire,
        }
    }
}
