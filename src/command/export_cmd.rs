use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, Write};

use crate::cli::default_backup_filename;
use crate::export::export_text;
use crate::state::read_active;
use crate::storage::{build_bundle, restore_bundle, BackupBundle, KvStore, ListStore};

use super::lists::resolve;

pub fn run_export(
    data_dir: Option<String>,
    format: &str,
    list_ref: Option<String>,
    out: Option<String>,
) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let store = ListStore::new(kv.clone());

    match format {
        "txt" => {
            let list = match &list_ref {
                Some(list_ref) => {
                    let entry = resolve(&store, list_ref)?;
                    store.load(&entry.id)?
                }
                None => read_active(&kv)?.context("No active list to export")?,
            };
            let text = export_text(&list);
            match out {
                Some(path) => {
                    fs::write(&path, &text)
                        .with_context(|| format!("Failed to write export to {}", path))?;
                    println!("✅ Exported '{}' to {}", list.name, path);
                }
                None => print!("{}", text),
            }
        }
        "json" => {
            let bundle = build_bundle(&store)?;
            let json = serde_json::to_string_pretty(&bundle)
                .context("Failed to serialize backup bundle")?;
            let path = out.unwrap_or_else(default_backup_filename);
            fs::write(&path, json)
                .with_context(|| format!("Failed to write backup to {}", path))?;
            println!(
                "✅ Backed up {} list(s) to {}",
                bundle.lists.len(),
                path
            );
        }
        other => bail!("Unknown export format '{}' (expected txt or json)", other),
    }

    Ok(())
}

pub fn run_restore(data_dir: Option<String>, file: &str, yes: bool) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let store = ListStore::new(kv.clone());

    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read backup file {}", file))?;
    let bundle: BackupBundle = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid backup bundle", file))?;

    let current = store.index()?.len();
    if !yes && current > 0 {
        print!(
            "This replaces your {} saved list(s) with the {} in the bundle. Continue? [y/N]: ",
            current,
            bundle.lists.len()
        );
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();
        if answer != "y" && answer != "yes" {
            println!("Restore cancelled. Nothing was changed.");
            return Ok(());
        }
    }

    let report = restore_bundle(&store, bundle)?;
    println!(
        "✅ Restored {} list(s) (replaced {}).",
        report.restored, report.replaced
    );
    println!("   The previous state was snapshotted and can be recovered from storage.");

    Ok(())
}
