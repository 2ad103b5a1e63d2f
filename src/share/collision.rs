//! Name-collision protocol for shared-list imports.
//!
//! An imported list whose name matches an existing saved list (after
//! stripping a trailing "(Compartida)"/"(Shared)" suffix,
//! case-insensitive) is never auto-merged: the caller presents both
//! versions and applies the user's choice of overwrite-in-place or
//! import-as-copy.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::{ChecklistData, SavedList};
use crate::storage::{ListStore, StorageError};

use super::codec::SharedList;

static SHARED_SUFFIX: OnceLock<Regex> = OnceLock::new();

fn shared_suffix() -> &'static Regex {
    SHARED_SUFFIX.get_or_init(|| {
        Regex::new(r"(?i)\s*\((compartida|shared)\)\s*$").expect("Invalid shared-suffix pattern")
    })
}

/// Strip a trailing "(Compartida)"/"(Shared)" suffix, case-insensitive.
pub fn strip_shared_suffix(name: &str) -> String {
    shared_suffix().replace(name, "").to_string()
}

/// Find a saved list colliding with the shared list's name.
pub fn find_existing(
    store: &ListStore,
    shared_name: &str,
) -> Result<Option<SavedList>, StorageError> {
    let needle = strip_shared_suffix(shared_name).to_lowercase();
    Ok(store
        .index()?
        .into_iter()
        .find(|entry| strip_shared_suffix(&entry.name).to_lowercase() == needle))
}

/// Import a shared list as an independent new list with a fresh id.
pub fn import_as_new(store: &ListStore, shared: &SharedList) -> Result<ChecklistData, StorageError> {
    let mut list = ChecklistData::new(shared.name.clone());
    list.tasks = shared.tasks.clone();
    list.observations = shared.observations.clone();
    list.team = shared.team.clone();
    list.priority = shared.priority;
    list.shared_at = shared.shared_at;
    list.share_version = shared.share_version.clone();
    store.save(&mut list)?;
    Ok(list)
}

/// Overwrite an existing saved list in place: its id, name and
/// `createdDate` are kept; the incoming tasks, observations and team are
/// adopted; `modifiedDate` is stamped by the save.
pub fn overwrite_existing(
    store: &ListStore,
    existing_id: &str,
    shared: &SharedList,
) -> Result<ChecklistData, StorageError> {
    let mut list = store.load(existing_id)?;
    list.tasks = shared.tasks.clone();
    list.observations = shared.observations.clone();
    list.team = shared.team.clone();
    list.priority = shared.priority;
    list.shared_at = shared.shared_at;
    list.share_version = shared.share_version.clone();
    store.save(&mut list)?;
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KvStore;
    use tempfile::TempDir;

    fn open_store(tmp: &TempDir) -> ListStore {
        let kv = KvStore::new(Some(tmp.path().to_string_lossy().to_string())).unwrap();
        ListStore::new(kv)
    }

    fn shared_named(name: &str) -> SharedList {
        let mut list = ChecklistData::new(name);
        list.add_task("Milk");
        SharedList::from_checklist(&list)
    }

    #[test]
    fn test_strip_shared_suffix_variants() {
        assert_eq!(strip_shared_suffix("Groceries (Compartida)"), "Groceries");
        assert_eq!(strip_shared_suffix("Groceries (SHARED)"), "Groceries");
        assert_eq!(strip_shared_suffix("Groceries (shared) "), "Groceries");
        assert_eq!(strip_shared_suffix("Groceries"), "Groceries");
        assert_eq!(strip_shared_suffix("Shared things"), "Shared things");
    }

    #[test]
    fn test_collision_detected_across_suffix_and_case() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut existing = ChecklistData::new("Groceries");
        store.save(&mut existing).unwrap();

        let hit = find_existing(&store, "Groceries (Compartida)").unwrap();
        assert_eq!(hit.unwrap().id, existing.id);

        let hit = find_existing(&store, "gROCERIES (Shared)").unwrap();
        assert!(hit.is_some());

        assert!(find_existing(&store, "Errands").unwrap().is_none());
    }

    #[test]
    fn test_import_as_new_gets_fresh_identity() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let shared = shared_named("Groceries (Shared)");
        let imported = import_as_new(&store, &shared).unwrap();

        assert_eq!(imported.name, "Groceries (Shared)");
        assert_eq!(imported.tasks.len(), 1);
        assert!(store.load(&imported.id).is_ok());
    }

    #[test]
    fn test_overwrite_keeps_identity_adopts_content() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut existing = ChecklistData::new("Groceries");
        existing.add_task("Old task");
        store.save(&mut existing).unwrap();
        let created = store.load(&existing.id).unwrap().created_date;

        let mut shared = shared_named("Groceries (Compartida)");
        shared.observations = "from a friend".to_string();
        let updated = overwrite_existing(&store, &existing.id, &shared).unwrap();

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.name, "Groceries");
        assert_eq!(updated.created_date, created);
        assert!(updated.modified_date > existing.modified_date);
        assert_eq!(updated.tasks[0].name, "Milk");
        assert_eq!(updated.observations, "from a friend");

        // Still a single saved list
        assert_eq!(store.index().unwrap().len(), 1);
    }
}
