//! Local persistence for checklists.
//!
//! Everything lives in a directory-backed key-value store (one file per
//! key, string values) with a fixed capacity budget. The module handles
//! the saved-list index, full list records, quota accounting/eviction and
//! backup bundles.

mod backup;
mod kv;
mod lists;
mod quota;
#[cfg(test)]
mod tests;

use thiserror::Error;

pub use backup::{build_bundle, restore_bundle, BackupBundle, RestoreReport, BUNDLE_VERSION};
pub use kv::KvStore;
pub use lists::{ListStore, SaveOutcome};
pub use quota::{
    check_before_write, classify, usage_percentage, QuotaBand, WriteCheck, MAX_CAPACITY_BYTES,
};

/// Key holding the in-progress active list.
pub const KEY_ACTIVE_LIST: &str = "checklist_data";
/// Key holding the JSON array of saved-list index entries.
pub const KEY_SAVED_LISTS: &str = "saved_lists";
/// Key holding the theme preference ("dark" | "light").
pub const KEY_THEME: &str = "theme";
/// Safety snapshot written before a destructive restore.
pub const KEY_BACKUP_BEFORE_IMPORT: &str = "last_backup_before_import";
pub const KEY_BACKUP_DATE: &str = "last_backup_date";

/// Storage key for a saved list's full record.
pub fn list_key(id: &str) -> String {
    format!("list_{}", id)
}

/// Storage failure taxonomy. All variants are recovered at the call site
/// and surfaced to the user; none crash the application.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write '{key}' to storage: {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read '{key}' from storage: {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("List not found: {0}")]
    NotFound(String),
}
