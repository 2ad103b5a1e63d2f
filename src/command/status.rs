use anyhow::Result;

use crate::storage::{check_before_write, KvStore, ListStore, QuotaBand, MAX_CAPACITY_BYTES};

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} bytes", bytes)
    }
}

pub fn run_status(data_dir: Option<String>) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let store = ListStore::new(kv.clone());

    let usage = kv.usage_bytes();
    let check = check_before_write(&kv);
    let indicator = match check.band {
        QuotaBand::Safe => "✅",
        QuotaBand::Warning => "⚠️",
        QuotaBand::Danger => "❌",
    };

    println!("Storage: {}", kv.dir().display());
    println!(
        "{} Usage: {} of {} ({}%, {})",
        indicator,
        format_bytes(usage),
        format_bytes(MAX_CAPACITY_BYTES),
        check.percentage,
        check.band.as_str(),
    );
    println!("   Saved lists: {}", store.index()?.len());
    if let Some(warning) = check.warning() {
        println!("   {}", warning);
    }

    Ok(())
}
