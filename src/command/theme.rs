use anyhow::{bail, Result};

use crate::storage::{KvStore, KEY_THEME};

pub fn run_theme(data_dir: Option<String>, value: Option<String>) -> Result<()> {
    let kv = KvStore::new(data_dir)?;

    match value {
        None => match kv.get(KEY_THEME)? {
            Some(theme) => println!("Theme: {}", theme),
            None => println!("Theme: light (default)"),
        },
        Some(theme) => {
            if theme != "dark" && theme != "light" {
                bail!("Unknown theme '{}' (expected dark or light)", theme);
            }
            kv.set(KEY_THEME, &theme)?;
            println!("✅ Theme set to {}", theme);
        }
    }

    Ok(())
}
