use anyhow::{Context, Result};
use chrono::Utc;

use crate::share::{generate_shareable_url, shorten_url, SHARE_VERSION};
use crate::state::{read_active, write_active};
use crate::storage::{KvStore, ListStore};

use super::lists::resolve;

pub async fn run_share(
    data_dir: Option<String>,
    list_ref: Option<String>,
    shorten: bool,
    open_browser: bool,
) -> Result<()> {
    let kv = KvStore::new(data_dir)?;
    let store = ListStore::new(kv.clone());

    let mut list = match &list_ref {
        Some(list_ref) => {
            let entry = resolve(&store, list_ref)?;
            store.load(&entry.id)?
        }
        None => read_active(&kv)?.context("No active list to share")?,
    };

    let url = generate_shareable_url(&list)?;

    // Record that (and when) this list was shared
    list.shared_at = Some(Utc::now());
    list.share_version = Some(SHARE_VERSION.to_string());
    match &list_ref {
        Some(_) => {
            store.save(&mut list)?;
        }
        None => write_active(&kv, &list)?,
    }

    println!("🔗 Share URL for '{}' ({} characters):", list.name, url.len());
    println!("\n{}\n", url);

    if shorten {
        match shorten_url(&url).await {
            Ok(short) => println!("✂️  Short URL: {}", short),
            Err(e) => println!("⚠️  Could not shorten the URL: {}", e),
        }
    }

    if open_browser {
        println!("🌐 Opening share URL in your browser...");
        if open::that(&url).is_err() {
            println!("⚠️  Could not open browser automatically.");
        }
    }

    Ok(())
}
