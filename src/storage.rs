//! Persisted key/value slots.
//!
//! Everything the application remembers lives in a handful of string-keyed
//! slots, each holding one JSON document. `FileStorage` keeps one
//! `<key>.json` file per slot in the data directory; `MemoryStorage` keeps
//! them in a map for tests and throwaway sessions.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::fields::Theme;

/// Slot holding the serialised task list.
pub const TASKS_KEY: &str = "tasks";
/// Slot holding the colour scheme preference.
pub const THEME_KEY: &str = "color-scheme";

/// A string-keyed store of string values. Writes replace the whole value.
pub trait Storage {
    /// Read a slot. `Ok(None)` when the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Directory-backed storage, one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStorage { dir })
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        debug!(key, bytes = data.len(), "read slot");
        Ok(Some(data))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        if let Err(e) = replace_file(&tmp, &path, value) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                debug!(key, "no temp file to remove: {cleanup}");
            }
            return Err(e.into());
        }
        debug!(key, bytes = value.len(), "wrote slot");
        Ok(())
    }
}

/// Write `value` to `tmp`, sync it to disk and rename it over `path`, so the
/// slot holds either the old document or the new one.
fn replace_file(tmp: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    let mut f = File::create(tmp)?;
    f.write_all(value.as_bytes())?;
    f.sync_all()?;
    fs::rename(tmp, path)
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the colour scheme, falling back to light on anything unexpected.
pub fn load_theme<S: Storage + ?Sized>(storage: &S) -> Theme {
    match storage.get(THEME_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("ignoring unreadable colour scheme: {e}");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(e) => {
            warn!("could not read colour scheme: {e}");
            Theme::default()
        }
    }
}

pub fn save_theme<S: Storage + ?Sized>(storage: &mut S, theme: Theme) -> Result<()> {
    storage.set(THEME_KEY, &serde_json::to_string(&theme)?)
}
