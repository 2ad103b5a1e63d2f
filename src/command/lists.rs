use anyhow::{Context, Result};

use crate::domain::SavedList;
use crate::state::{clear_active, read_active, write_active};
use crate::storage::{KvStore, ListStore};

/// Resolve a list reference (id or name) against the index.
pub(crate) fn resolve(store: &ListStore, list_ref: &str) -> Result<SavedList> {
    let index = store.index()?;
    if let Some(entry) = index.into_iter().find(|e| e.id == list_ref) {
        return Ok(entry);
    }
    store
        .find_by_name(list_ref)?
        .with_context(|| format!("List not found: {}", list_ref))
}

pub fn run_lists(data_dir: Option<String>) -> Result<()> {
    let store = ListStore::new(KvStore::new(data_dir)?);
    let index = store.index()?;

    if index.is_empty() {
        println!("No saved lists. Save the active list with 'listo save'.");
        return Ok(());
    }

    println!("Saved lists:");
    for entry in &index {
        let priority = entry
            .priority
            .map(|p| format!(" [{}]", p))
            .unwrap_or_default();
        println!(
            "  {:>5}/{:<5} {}{}  ({})",
            entry.completed_count,
            entry.tasks_count,
            entry.name,
            priority,
            entry.date.format("%Y-%m-%d %H:%M"),
        );
        if !entry.preview.is_empty() {
            println!("              {}", entry.preview);
        }
        println!("              id: {}", entry.id);
    }

    Ok(())
}

pub fn run_open(data_dir: Option<String>, list_ref: &str) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let store = ListStore::new(kv.clone());

    let entry = resolve(&store, list_ref)?;
    let list = store.load(&entry.id)?;
    write_active(&kv, &list)?;
    println!(
        "✅ Opened '{}' ({} task(s), {} completed)",
        list.name,
        list.tasks.len(),
        list.completed_count()
    );

    Ok(())
}

pub fn run_delete(data_dir: Option<String>, list_ref: &str) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let store = ListStore::new(kv.clone());

    let entry = resolve(&store, list_ref)?;
    store.delete(&entry.id)?;

    // Deleting the list that is currently open also clears the active copy
    if let Some(active) = read_active(&kv)? {
        if active.id == entry.id {
            clear_active(&kv)?;
        }
    }
    println!("🗑️  Deleted '{}'", entry.name);

    Ok(())
}

pub fn run_rename(data_dir: Option<String>, list_ref: &str, new_name: &str) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let store = ListStore::new(kv.clone());

    let entry = resolve(&store, list_ref)?;
    store.rename(&entry.id, new_name)?;

    if let Some(mut active) = read_active(&kv)? {
        if active.id == entry.id {
            active.name = new_name.to_string();
            write_active(&kv, &active)?;
        }
    }
    println!("✅ Renamed '{}' to '{}'", entry.name, new_name);

    Ok(())
}

pub fn run_duplicate(data_dir: Option<String>, list_ref: &str) -> Result<()> {
    let store = ListStore::new(KvStore::new(data_dir)?);

    let entry = resolve(&store, list_ref)?;
    let copy = store.duplicate(&entry.id)?;
    println!("✅ Duplicated '{}' as '{}'", entry.name, copy.name);

    Ok(())
}

pub fn run_reorder(data_dir: Option<String>, list_ref: &str, position: usize) -> Result<()> {
    let store = ListStore::new(KvStore::new(data_dir)?);

    let entry = resolve(&store, list_ref)?;
    store.reorder(&entry.id, position)?;
    println!("✅ Moved '{}' to position {}", entry.name, position);

    Ok(())
}
