//! The active (in-progress) list.
//!
//! One list is live at a time. The store owns it and broadcasts a fresh
//! snapshot after every mutation; mutation goes through a single
//! copy-on-write entry point so a change can never be applied without a
//! notification following it.

use std::sync::Arc;
use tracing::debug;

use crate::domain::ChecklistData;
use crate::storage::{KvStore, StorageError, KEY_ACTIVE_LIST};

use super::subject::{Subject, SubscriptionId};

/// Shared handle to the active-list store.
pub type SharedActiveList = Arc<ActiveListStore>;

/// Injected, explicitly-scoped owner of the active list.
pub struct ActiveListStore {
    subject: Subject<Option<ChecklistData>>,
}

impl ActiveListStore {
    pub fn new(initial: Option<ChecklistData>) -> Self {
        Self {
            subject: Subject::new(initial),
        }
    }

    pub fn shared(initial: Option<ChecklistData>) -> SharedActiveList {
        Arc::new(Self::new(initial))
    }

    /// Snapshot of the current active list.
    pub fn snapshot(&self) -> Option<ChecklistData> {
        self.subject.get()
    }

    /// Replace the active list wholesale (or clear it with `None`) and
    /// broadcast.
    pub fn replace(&self, list: Option<ChecklistData>) {
        self.subject.set(list);
    }

    /// Single mutation entry point: copy the current list, apply the
    /// mutation to the copy, then publish it. Returns `None` when no list
    /// is active (the mutation is not applied).
    pub fn update<R>(&self, mutate: impl FnOnce(&mut ChecklistData) -> R) -> Option<R> {
        let mut list = self.subject.get()?;
        let result = mutate(&mut list);
        self.subject.set(Some(list));
        Some(result)
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&Option<ChecklistData>) + Send + 'static,
    ) -> SubscriptionId {
        self.subject.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subject.unsubscribe(id)
    }
}

/// Read the persisted in-progress list, if any. A corrupt record is a
/// typed error so the caller can surface it instead of silently starting
/// over.
pub fn read_active(kv: &KvStore) -> Result<Option<ChecklistData>, StorageError> {
    let Some(raw) = kv.get(KEY_ACTIVE_LIST)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: KEY_ACTIVE_LIST.to_string(),
            source,
        })
}

/// Persist the in-progress list.
pub fn write_active(kv: &KvStore, list: &ChecklistData) -> Result<(), StorageError> {
    let raw = serde_json::to_string(list).map_err(|source| StorageError::Corrupt {
        key: KEY_ACTIVE_LIST.to_string(),
        source,
    })?;
    kv.set(KEY_ACTIVE_LIST, &raw)?;
    debug!("Persisted active list '{}'", list.name);
    Ok(())
}

/// Remove the persisted in-progress list.
pub fn clear_active(kv: &KvStore) -> Result<(), StorageError> {
    kv.remove(KEY_ACTIVE_LIST)
}
