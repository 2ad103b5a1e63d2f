//! Saved-list persistence.
//!
//! A saved list is two storage entries written together, never
//! independently: the lightweight `saved_lists` index entry and the full
//! `list_<id>` record. Every operation here maintains that pairing.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{ChecklistData, SavedList};

use super::{list_key, quota, KvStore, StorageError, KEY_SAVED_LISTS};

/// Result of a save: the advisory quota check that preceded the write and
/// the index entry evicted afterwards, if usage had reached the budget.
pub struct SaveOutcome {
    pub check: quota::WriteCheck,
    pub evicted: Option<SavedList>,
}

/// Store for saved lists, layered over the key-value namespace.
pub struct ListStore {
    kv: KvStore,
}

impl ListStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    /// Read the saved-list index. An absent key is an empty index.
    pub fn index(&self) -> Result<Vec<SavedList>, StorageError> {
        let Some(raw) = self.kv.get(KEY_SAVED_LISTS)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: KEY_SAVED_LISTS.to_string(),
            source,
        })
    }

    fn write_index(&self, entries: &[SavedList]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(entries).map_err(|source| StorageError::Corrupt {
            key: KEY_SAVED_LISTS.to_string(),
            source,
        })?;
        self.kv.set(KEY_SAVED_LISTS, &raw)
    }

    /// Save a list: stamps `modifiedDate`, writes the full record and its
    /// index entry together, then runs the reactive eviction check.
    ///
    /// The save itself is never blocked by quota. Eviction is reactive:
    /// when usage had already reached 100% before this save, the single
    /// oldest list is evicted right after the write. The save that first
    /// pushes usage over budget therefore evicts nothing; the next one
    /// does.
    pub fn save(&self, list: &mut ChecklistData) -> Result<SaveOutcome, StorageError> {
        let check = quota::check_before_write(&self.kv);

        list.touch();
        let record = serde_json::to_string(list).map_err(|source| StorageError::Corrupt {
            key: list_key(&list.id),
            source,
        })?;
        self.kv.set(&list_key(&list.id), &record)?;

        let mut entries = self.index()?;
        match entries.iter_mut().find(|e| e.id == list.id) {
            Some(entry) => *entry = list.to_summary(),
            None => entries.push(list.to_summary()),
        }
        self.write_index(&entries)?;
        debug!("Saved list '{}' ({})", list.name, list.id);

        // Never evict the sole remaining list out from under the user.
        let mut evicted = None;
        if check.percentage >= 100 && entries.len() > 1 {
            evicted = self.evict_oldest()?;
        }

        Ok(SaveOutcome { check, evicted })
    }

    /// Load a saved list's full record.
    pub fn load(&self, id: &str) -> Result<ChecklistData, StorageError> {
        let key = list_key(id);
        let Some(raw) = self.kv.get(&key)? else {
            return Err(StorageError::NotFound(id.to_string()));
        };
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt { key, source })
    }

    /// Load every saved list in index order. Corrupt or missing records
    /// are skipped with a warning so one bad entry cannot take the whole
    /// set down.
    pub fn load_all(&self) -> Result<Vec<ChecklistData>, StorageError> {
        let mut lists = Vec::new();
        for entry in self.index()? {
            match self.load(&entry.id) {
                Ok(list) => lists.push(list),
                Err(e) => warn!("Skipping unreadable list '{}': {}", entry.name, e),
            }
        }
        Ok(lists)
    }

    /// Delete a saved list: index entry and full record removed together.
    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut entries = self.index()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before && !self.kv.contains(&list_key(id)) {
            return Err(StorageError::NotFound(id.to_string()));
        }
        self.kv.remove(&list_key(id))?;
        self.write_index(&entries)
    }

    /// Rename a saved list in both the record and its index entry.
    pub fn rename(&self, id: &str, new_name: &str) -> Result<(), StorageError> {
        let mut list = self.load(id)?;
        list.name = new_name.to_string();
        self.save(&mut list)?;
        Ok(())
    }

    /// Duplicate a saved list as an independent new list: fresh id, fresh
    /// dates, " (Copy)" suffix, share metadata cleared.
    pub fn duplicate(&self, id: &str) -> Result<ChecklistData, StorageError> {
        let source = self.load(id)?;
        let mut copy = ChecklistData::new(format!("{} (Copy)", source.name));
        copy.tasks = source.tasks;
        copy.observations = source.observations;
        copy.team = source.team;
        copy.priority = source.priority;
        self.save(&mut copy)?;
        info!("Duplicated list '{}' as '{}'", id, copy.id);
        Ok(copy)
    }

    /// Move a list to a new zero-based position in the index.
    pub fn reorder(&self, id: &str, position: usize) -> Result<(), StorageError> {
        let mut entries = self.index()?;
        let Some(from) = entries.iter().position(|e| e.id == id) else {
            return Err(StorageError::NotFound(id.to_string()));
        };
        let entry = entries.remove(from);
        let to = position.min(entries.len());
        entries.insert(to, entry);
        self.write_index(&entries)
    }

    /// Case-insensitive exact name lookup in the index.
    pub fn find_by_name(&self, name: &str) -> Result<Option<SavedList>, StorageError> {
        let needle = name.to_lowercase();
        Ok(self
            .index()?
            .into_iter()
            .find(|e| e.name.to_lowercase() == needle))
    }

    /// Evict the single oldest saved list.
    ///
    /// Scans every saved list's full record and compares `modifiedDate`,
    /// falling back to `createdDate`; records missing both sort oldest so
    /// broken entries go first. Returns the evicted index entry.
    pub fn evict_oldest(&self) -> Result<Option<SavedList>, StorageError> {
        let entries = self.index()?;
        let mut oldest: Option<(SavedList, DateTime<Utc>)> = None;

        for entry in entries {
            let stamp = self.record_timestamp(&entry.id);
            match &oldest {
                Some((_, current)) if stamp >= *current => {}
                _ => oldest = Some((entry, stamp)),
            }
        }

        let Some((victim, stamp)) = oldest else {
            return Ok(None);
        };
        info!(
            "Evicting oldest list '{}' (last modified {})",
            victim.name, stamp
        );
        self.delete(&victim.id)?;
        Ok(Some(victim))
    }

    /// `modifiedDate` of a full record, falling back to `createdDate`.
    /// Unreadable records report the epoch so they are evicted first.
    fn record_timestamp(&self, id: &str) -> DateTime<Utc> {
        let raw = match self.kv.get(&list_key(id)) {
            Ok(Some(raw)) => raw,
            _ => return DateTime::UNIX_EPOCH,
        };
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            return DateTime::UNIX_EPOCH;
        };
        ["modifiedDate", "createdDate"]
            .iter()
            .filter_map(|field| value.get(field))
            .filter_map(|v| v.as_str())
            .filter_map(|s| s.parse::<DateTime<Utc>>().ok())
            .next()
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}
