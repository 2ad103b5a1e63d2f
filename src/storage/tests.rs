//! Tests for the storage module.

#[cfg(test)]
mod tests {
    use crate::domain::ChecklistData;
    use crate::storage::{
        build_bundle, check_before_write, classify, list_key, restore_bundle, usage_percentage,
        BackupBundle, KvStore, ListStore, QuotaBand, StorageError, BUNDLE_VERSION,
        KEY_BACKUP_BEFORE_IMPORT, KEY_BACKUP_DATE, KEY_SAVED_LISTS,
    };
    use chrono::Utc;
    use tempfile::TempDir;

    fn open_store(tmp: &TempDir) -> ListStore {
        let kv = KvStore::new(Some(tmp.path().to_string_lossy().to_string())).unwrap();
        ListStore::new(kv)
    }

    #[test]
    fn test_kv_set_get_remove() {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::new(Some(tmp.path().to_string_lossy().to_string())).unwrap();

        assert_eq!(kv.get("theme").unwrap(), None);
        kv.set("theme", "dark").unwrap();
        assert_eq!(kv.get("theme").unwrap(), Some("dark".to_string()));
        assert!(kv.contains("theme"));

        kv.remove("theme").unwrap();
        assert_eq!(kv.get("theme").unwrap(), None);
        // Removing an absent key is a no-op
        kv.remove("theme").unwrap();
    }

    #[test]
    fn test_kv_usage_counts_keys_and_values() {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::new(Some(tmp.path().to_string_lossy().to_string())).unwrap();

        assert_eq!(kv.usage_bytes(), 0);
        kv.set("abc", "12345").unwrap();
        assert_eq!(kv.usage_bytes(), 3 + 5);
        kv.set("de", "1").unwrap();
        assert_eq!(kv.usage_bytes(), 3 + 5 + 2 + 1);
    }

    #[test]
    fn test_save_writes_record_and_index_together() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut list = ChecklistData::new("Groceries");
        list.add_task("Milk");
        store.save(&mut list).unwrap();

        assert!(store.kv().contains(&list_key(&list.id)));
        assert!(store.kv().contains(KEY_SAVED_LISTS));

        let index = store.index().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].id, list.id);
        assert_eq!(index[0].tasks_count, 1);

        let loaded = store.load(&list.id).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn test_resave_updates_index_entry_in_place() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut list = ChecklistData::new("Groceries");
        store.save(&mut list).unwrap();
        list.add_task("Milk");
        store.save(&mut list).unwrap();

        let index = store.index().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].tasks_count, 1);
    }

    #[test]
    fn test_delete_removes_both_entries() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut list = ChecklistData::new("Gone");
        store.save(&mut list).unwrap();
        store.delete(&list.id).unwrap();

        assert!(!store.kv().contains(&list_key(&list.id)));
        assert!(store.index().unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);
        assert!(matches!(
            store.delete("nope"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_unknown_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);
        assert!(matches!(store.load("nope"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_rename_touches_record_and_index() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut list = ChecklistData::new("Old name");
        store.save(&mut list).unwrap();
        store.rename(&list.id, "New name").unwrap();

        assert_eq!(store.load(&list.id).unwrap().name, "New name");
        assert_eq!(store.index().unwrap()[0].name, "New name");
    }

    #[test]
    fn test_duplicate_is_independent() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut list = ChecklistData::new("Groceries");
        list.add_task("Milk");
        store.save(&mut list).unwrap();

        let copy = store.duplicate(&list.id).unwrap();
        assert_ne!(copy.id, list.id);
        assert_eq!(copy.name, "Groceries (Copy)");
        assert_eq!(copy.tasks.len(), 1);
        assert_eq!(store.index().unwrap().len(), 2);

        // Mutating the copy leaves the original untouched
        store.delete(&copy.id).unwrap();
        assert!(store.load(&list.id).is_ok());
    }

    #[test]
    fn test_reorder_moves_index_entry() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut a = ChecklistData::new("a");
        let mut b = ChecklistData::new("b");
        let mut c = ChecklistData::new("c");
        store.save(&mut a).unwrap();
        store.save(&mut b).unwrap();
        store.save(&mut c).unwrap();

        store.reorder(&c.id, 0).unwrap();
        let names: Vec<_> = store.index().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut list = ChecklistData::new("Groceries");
        store.save(&mut list).unwrap();

        assert!(store.find_by_name("gRoCeRiEs").unwrap().is_some());
        assert!(store.find_by_name("Errands").unwrap().is_none());
    }

    #[test]
    fn test_usage_percentage_monotonic_across_saves() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut last = usage_percentage(store.kv());
        for i in 0..5 {
            let mut list = ChecklistData::new(format!("list-{}", i));
            list.observations = "x".repeat(10_000);
            store.save(&mut list).unwrap();
            let now = usage_percentage(store.kv());
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_band_matches_percentage() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);
        let check = check_before_write(store.kv());
        assert_eq!(check.band, classify(check.percentage));
        assert_eq!(check.band, QuotaBand::Safe);
    }

    #[test]
    fn test_crossing_save_does_not_evict_next_save_does() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut old = ChecklistData::new("oldest");
        old.observations = "x".repeat(1_900_000);
        store.save(&mut old).unwrap();

        // This save pushes usage over 100% but evicts nothing itself
        let mut big = ChecklistData::new("big");
        big.observations = "x".repeat(1_900_000);
        let outcome = store.save(&mut big).unwrap();
        assert!(outcome.evicted.is_none());
        assert!(usage_percentage(store.kv()) >= 100);

        // The next save sees the exhausted budget and evicts exactly one:
        // the oldest list
        let mut small = ChecklistData::new("small");
        let outcome = store.save(&mut small).unwrap();
        let evicted = outcome.evicted.expect("expected an eviction");
        assert_eq!(evicted.name, "oldest");

        let names: Vec<_> = store.index().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["big", "small"]);
    }

    #[test]
    fn test_evict_oldest_falls_back_to_created_date() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut a = ChecklistData::new("a");
        let mut b = ChecklistData::new("b");
        store.save(&mut a).unwrap();
        store.save(&mut b).unwrap();

        // Strip b's modifiedDate and age its createdDate far into the past;
        // the fallback should make it the eviction victim even though it
        // was saved last.
        let raw = store.kv().get(&list_key(&b.id)).unwrap().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        value.as_object_mut().unwrap().remove("modifiedDate");
        value["createdDate"] = serde_json::json!("2001-01-01T00:00:00Z");
        store
            .kv()
            .set(&list_key(&b.id), &value.to_string())
            .unwrap();

        let evicted = store.evict_oldest().unwrap().unwrap();
        assert_eq!(evicted.name, "b");
        assert!(store.load(&a.id).is_ok());
    }

    #[test]
    fn test_evict_oldest_on_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);
        assert!(store.evict_oldest().unwrap().is_none());
    }

    #[test]
    fn test_backup_bundle_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut list = ChecklistData::new("Keep me");
        list.add_task("Milk");
        store.save(&mut list).unwrap();

        let bundle = build_bundle(&store).unwrap();
        assert_eq!(bundle.version, BUNDLE_VERSION);
        assert_eq!(bundle.lists.len(), 1);

        let json = serde_json::to_string(&bundle).unwrap();
        assert!(json.contains("\"exportDate\""));
        let parsed: BackupBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.lists[0].name, "Keep me");
    }

    #[test]
    fn test_restore_snapshots_then_replaces() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp);

        let mut current = ChecklistData::new("Current");
        store.save(&mut current).unwrap();

        let incoming = BackupBundle {
            version: BUNDLE_VERSION.to_string(),
            export_date: Utc::now(),
            lists: vec![ChecklistData::new("Imported A"), ChecklistData::new("Imported B")],
        };
        let report = restore_bundle(&store, incoming).unwrap();
        assert_eq!(report.restored, 2);
        assert_eq!(report.replaced, 1);

        let names: Vec<_> = store.index().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Imported A", "Imported B"]);

        // The pre-import state is recoverable from the safety snapshot
        let snapshot = store.kv().get(KEY_BACKUP_BEFORE_IMPORT).unwrap().unwrap();
        let snapshot: BackupBundle = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(snapshot.lists[0].name, "Current");
        assert!(store.kv().contains(KEY_BACKUP_DATE));
    }
}
