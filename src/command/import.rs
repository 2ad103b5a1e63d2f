use anyhow::{bail, Result};
use std::io::{self, Write};

use crate::domain::SavedList;
use crate::share::{
    decode_payload, decode_shared_url, find_existing, import_as_new, overwrite_existing,
    SharedList,
};
use crate::state::write_active;
use crate::storage::{KvStore, ListStore};

enum Resolution {
    Overwrite,
    ImportAsCopy,
    Abort,
}

/// Present both versions and ask the user how to resolve the collision.
fn prompt_resolution(existing: &SavedList, incoming: &SharedList) -> Result<Resolution> {
    println!("⚠️  A list named '{}' already exists.\n", existing.name);
    println!(
        "  Existing: {} task(s), {} completed, last saved {}",
        existing.tasks_count,
        existing.completed_count,
        existing.date.format("%Y-%m-%d %H:%M"),
    );
    let shared_at = incoming
        .shared_at
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!(
        "  Incoming: '{}', {} task(s), shared {}\n",
        incoming.name,
        incoming.tasks.len(),
        shared_at,
    );

    print!("Update the existing list, import as a copy, or abort? [u/c/A]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(match answer.trim().to_lowercase().as_str() {
        "u" | "update" => Resolution::Overwrite,
        "c" | "copy" => Resolution::ImportAsCopy,
        _ => Resolution::Abort,
    })
}

pub fn run_import(
    data_dir: Option<String>,
    url: &str,
    overwrite: bool,
    copy: bool,
) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let store = ListStore::new(kv.clone());

    // Accept a full share URL or a bare payload
    let Some(shared) = decode_shared_url(url).or_else(|| decode_payload(url)) else {
        bail!("No shared list found in that URL (the payload may be malformed)");
    };

    let existing = find_existing(&store, &shared.name)?;
    let imported = match existing {
        None => {
            let list = import_as_new(&store, &shared)?;
            println!("✅ Imported '{}' ({} task(s))", list.name, list.tasks.len());
            list
        }
        Some(existing) => {
            let resolution = if overwrite {
                Resolution::Overwrite
            } else if copy {
                Resolution::ImportAsCopy
            } else {
                prompt_resolution(&existing, &shared)?
            };
            match resolution {
                Resolution::Overwrite => {
                    let list = overwrite_existing(&store, &existing.id, &shared)?;
                    println!("✅ Updated '{}' with the shared version", list.name);
                    list
                }
                Resolution::ImportAsCopy => {
                    let list = import_as_new(&store, &shared)?;
                    println!("✅ Imported '{}' as a new list", list.name);
                    list
                }
                Resolution::Abort => {
                    println!("Import cancelled. Nothing was changed.");
                    return Ok(());
                }
            }
        }
    };

    // The imported list becomes the active list
    write_active(&kv, &imported)?;

    Ok(())
}
