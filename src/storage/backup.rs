//! Backup bundles and destructive restore.
//!
//! The export format is a self-contained JSON bundle of every saved list.
//! Restoring a bundle replaces the saved lists wholesale, so the current
//! state is snapshotted to storage first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::ChecklistData;

use super::{ListStore, StorageError, KEY_BACKUP_BEFORE_IMPORT, KEY_BACKUP_DATE};

/// Bundle format version.
pub const BUNDLE_VERSION: &str = "1.0";

/// Exported backup bundle.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupBundle {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub lists: Vec<ChecklistData>,
}

/// What a restore did.
pub struct RestoreReport {
    pub restored: usize,
    pub replaced: usize,
}

/// Build a bundle from every saved list.
pub fn build_bundle(store: &ListStore) -> Result<BackupBundle, StorageError> {
    Ok(BackupBundle {
        version: BUNDLE_VERSION.to_string(),
        export_date: Utc::now(),
        lists: store.load_all()?,
    })
}

/// Replace all saved lists with the bundle's contents.
///
/// A safety snapshot of the current state is written to
/// `last_backup_before_import` / `last_backup_date` before anything is
/// deleted, so a bad import can be undone by restoring the snapshot.
pub fn restore_bundle(store: &ListStore, bundle: BackupBundle) -> Result<RestoreReport, StorageError> {
    if bundle.version != BUNDLE_VERSION {
        warn!(
            "Restoring bundle with version '{}' (expected '{}')",
            bundle.version, BUNDLE_VERSION
        );
    }

    let snapshot = build_bundle(store)?;
    let snapshot_json =
        serde_json::to_string(&snapshot).map_err(|source| StorageError::Corrupt {
            key: KEY_BACKUP_BEFORE_IMPORT.to_string(),
            source,
        })?;
    store.kv().set(KEY_BACKUP_BEFORE_IMPORT, &snapshot_json)?;
    store
        .kv()
        .set(KEY_BACKUP_DATE, &Utc::now().to_rfc3339())?;

    let existing = store.index()?;
    let replaced = existing.len();
    for entry in existing {
        store.delete(&entry.id)?;
    }

    let mut restored = 0;
    for mut list in bundle.lists {
        store.save(&mut list)?;
        restored += 1;
    }
    info!("Restored {} list(s), replaced {}", restored, replaced);

    Ok(RestoreReport { restored, replaced })
}
