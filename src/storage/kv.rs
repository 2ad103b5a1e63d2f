//! Directory-backed key-value store.
//!
//! Mirrors the storage layout of the original web app: a flat namespace of
//! string keys to string values, one file per key under the store
//! directory. Values are written and read whole; there is no partial
//! update.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::StorageError;

/// Key-value store rooted at a single directory.
///
/// Keys map directly to file names; the namespace only ever contains the
/// fixed application keys plus one `list_<id>` entry per saved list.
#[derive(Clone)]
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    /// Open (creating if needed) the store under the given data directory.
    ///
    /// # Arguments
    /// * `data_dir` - Optional custom data directory. Defaults to ~/.listo
    pub fn new(data_dir: Option<String>) -> Result<Self> {
        let base_dir = match data_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".listo"),
        };

        let dir = base_dir.join("store");
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create store directory: {:?}", dir))?;

        Ok(Self { dir })
    }

    /// The store directory path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read a value. `Ok(None)` when the key is absent.
    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::ReadFailed {
                key: key.to_string(),
                source,
            })
    }

    /// Write a value. Engine-level failures (including disk exhaustion)
    /// surface as `StorageError::WriteFailed`, never silently swallowed.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        fs::write(&path, value).map_err(|source| StorageError::WriteFailed {
            key: key.to_string(),
            source,
        })?;
        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    /// Remove a key. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|source| StorageError::WriteFailed {
            key: key.to_string(),
            source,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }

    /// Aggregate usage: byte length of every key+value pair in the
    /// namespace. No caching; recomputed per call.
    pub fn usage_bytes(&self) -> u64 {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };
        entries
            .flatten()
            .filter(|e| e.path().is_file())
            .map(|e| {
                let key_len = e.file_name().len() as u64;
                let value_len = e.metadata().map(|m| m.len()).unwrap_or(0);
                key_len + value_len
            })
            .sum()
    }
}
