use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Durable boolean flags that outlive a player instance.
///
/// Keys are fixed strings with no namespacing; the last writer wins.
pub trait PreferenceStore: Send + Sync {
    /// Stored value, `false` when the key was never written
    fn get_bool(&self, key: &str) -> bool;
    fn set_bool(&self, key: &str, value: bool);
}

/// Process-local store, used by tests and embedders without persistence
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, bool>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: bool) -> Self {
        let store = Self::new();
        store.set_bool(key, value);
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_bool(&self, key: &str) -> bool {
        self.values
            .lock()
            .map(|values| values.get(key).copied().unwrap_or(false))
            .unwrap_or(false)
    }

    fn set_bool(&self, key: &str, value: bool) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value);
        }
    }
}

/// JSON file backed store. Values are read once and written through.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<HashMap<String, bool>>,
}

impl FilePreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path).context("Failed to read preferences file")?;
            serde_json::from_str(&contents).context("Failed to parse preferences file")?
        } else {
            debug!("No preferences file at {:?}, starting empty", path);
            HashMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, bool>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }
        let contents =
            serde_json::to_string_pretty(values).context("Failed to serialize preferences")?;
        fs::write(&self.path, contents).context("Failed to write preferences file")?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get_bool(&self, key: &str) -> bool {
        self.values
            .lock()
            .map(|values| values.get(key).copied().unwrap_or(false))
            .unwrap_or(false)
    }

    fn set_bool(&self, key: &str, value: bool) {
        let Ok(mut values) = self.values.lock() else {
            return;
        };
        if values.get(key) == Some(&value) {
            return;
        }
        values.insert(key.to_string(), value);

        if let Err(e) = self.persist(&values) {
            warn!("Failed to save preference {}: {:#}", key, e);
        }
    }
}
