use anyhow::{Context, Result};

use crate::state::{read_active, write_active};
use crate::storage::{KvStore, ListStore};

pub fn run_save(data_dir: Option<String>) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let store = ListStore::new(kv.clone());

    let mut list = read_active(&kv)?.context("No active list to save")?;
    let outcome = store.save(&mut list)?;
    // Keep the active copy in sync with the stamped modification date
    write_active(&kv, &list)?;

    println!(
        "✅ Saved '{}' ({} task(s), {} completed)",
        list.name,
        list.tasks.len(),
        list.completed_count()
    );
    if let Some(warning) = outcome.check.warning() {
        println!("⚠️  {}", warning);
    }
    if let Some(evicted) = outcome.evicted {
        println!("🗑️  Evicted oldest list '{}' to free space", evicted.name);
    }

    Ok(())
}
