//! Background auto-save.
//!
//! A non-blocking interval task persists the active list every period.
//! Each tick re-reads the active list immediately before use; the store
//! reference is the only thing captured across the suspension point, so a
//! list replaced mid-interval is picked up, not a stale copy. Teardown
//! aborts the pending timer; a write already in progress runs to
//! completion.

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::storage::KvStore;

use super::active::{write_active, SharedActiveList};

/// Default auto-save period in seconds.
pub const DEFAULT_AUTOSAVE_SECS: u64 = 15;

/// Handle to a running auto-save loop.
pub struct Autosaver {
    handle: JoinHandle<()>,
}

impl Autosaver {
    /// Spawn the auto-save loop. The first save happens one full period
    /// after start.
    pub fn start(store: SharedActiveList, kv: KvStore, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // Consume the immediate first tick
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(list) = store.snapshot() else {
                    continue;
                };
                match write_active(&kv, &list) {
                    Ok(()) => debug!("Auto-saved '{}'", list.name),
                    Err(e) => warn!("Auto-save failed: {}", e),
                }
            }
        });
        Self { handle }
    }

    /// Stop the loop, clearing the pending timer.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChecklistData;
    use crate::state::active::{read_active, ActiveListStore};
    use tempfile::TempDir;

    fn open_kv(tmp: &TempDir) -> KvStore {
        KvStore::new(Some(tmp.path().to_string_lossy().to_string())).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_persists_after_each_period() {
        let tmp = TempDir::new().unwrap();
        let kv = open_kv(&tmp);
        let store = ActiveListStore::shared(Some(ChecklistData::new("Groceries")));
        let _saver = Autosaver::start(store.clone(), kv.clone(), Duration::from_secs(15));

        tokio::time::sleep(Duration::from_secs(14)).await;
        assert!(read_active(&kv).unwrap().is_none());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(read_active(&kv).unwrap().unwrap().name, "Groceries");
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_picks_up_list_replaced_mid_interval() {
        let tmp = TempDir::new().unwrap();
        let kv = open_kv(&tmp);
        let store = ActiveListStore::shared(Some(ChecklistData::new("First")));
        let _saver = Autosaver::start(store.clone(), kv.clone(), Duration::from_secs(15));

        // The active list is reassigned between start and the first tick
        tokio::time::sleep(Duration::from_secs(5)).await;
        store.replace(Some(ChecklistData::new("Second")));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(read_active(&kv).unwrap().unwrap().name, "Second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_skips_when_no_active_list() {
        let tmp = TempDir::new().unwrap();
        let kv = open_kv(&tmp);
        let store = ActiveListStore::shared(None);
        let _saver = Autosaver::start(store, kv.clone(), Duration::from_secs(15));

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(read_active(&kv).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_clears_pending_timer() {
        let tmp = TempDir::new().unwrap();
        let kv = open_kv(&tmp);
        let store = ActiveListStore::shared(Some(ChecklistData::new("Groceries")));
        let saver = Autosaver::start(store, kv.clone(), Duration::from_secs(15));

        saver.shutdown();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(read_active(&kv).unwrap().is_none());
    }
}
