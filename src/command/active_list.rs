use anyhow::{Context, Result};

use crate::domain::ChecklistData;
use crate::export::export_text;
use crate::state::{read_active, write_active};
use crate::storage::KvStore;

/// Run a mutation against the active list and persist the result.
///
/// The list is read fresh from storage, mutated, date-stamped and written
/// back; commands never hold a list across calls.
pub(crate) fn with_active<R>(
    kv: &KvStore,
    mutate: impl FnOnce(&mut ChecklistData) -> Result<R>,
) -> Result<R> {
    let mut list = read_active(kv)?
        .context("No active list. Create one with 'listo new' or open one with 'listo open'.")?;
    let result = mutate(&mut list)?;
    list.touch();
    write_active(kv, &list)?;
    Ok(result)
}

pub fn run_new(data_dir: Option<String>, name: &str) -> Result<()> {
    let kv = KvStore::new(data_dir)?;

    if let Some(previous) = read_active(&kv)? {
        println!(
            "Replacing active list '{}' (save it first if you want to keep changes).",
            previous.name
        );
    }

    let list = ChecklistData::new(name);
    write_active(&kv, &list)?;
    println!("✅ Created list '{}'. Add tasks with 'listo task add'.", name);
    Ok(())
}

pub fn run_show(data_dir: Option<String>) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let list = read_active(&kv)?
        .context("No active list. Create one with 'listo new' or open one with 'listo open'.")?;
    print!("{}", export_text(&list));
    Ok(())
}

pub fn run_obs(data_dir: Option<String>, text: &str) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    with_active(&kv, |list| {
        list.observations = text.to_string();
        Ok(())
    })?;
    if text.is_empty() {
        println!("✅ Observations cleared");
    } else {
        println!("✅ Observations updated");
    }
    Ok(())
}
