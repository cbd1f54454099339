//! Persistent key-value storage.
//!
//! The chart keeps everything it needs across sessions in a flat string store:
//! one entry for the grid snapshot and up to two entries per cell. The store
//! knows nothing about grids; key construction lives here so every layer agrees
//! on the schema.

use rustc_hash::FxHashMap;

/// Key of the grid snapshot entry.
pub const STATE_KEY: &str = "chart_state";

/// Prefix shared by every per-cell entry (images and captions).
pub const CELL_PREFIX: &str = "cell_";

/// Key of the image reference for a cell.
pub fn image_key(row: usize, col: usize) -> String {
    format!("cell_{}_{}", row, col)
}

/// Key of the caption override for a cell.
pub fn caption_key(row: usize, col: usize) -> String {
    format!("cell_text_{}_{}", row, col)
}

/// Flat string store with durability across sessions.
///
/// `get` reports unreadable entries as absent. Callers that must tell a
/// missing entry from a failed read use `try_get`. Writes surface backend
/// failures.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Like `get`, but a backend read failure is an error instead of `None`.
    fn try_get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.get(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;

    fn remove(&mut self, key: &str) -> Result<(), String>;

    /// All keys currently present, in ascending order.
    fn keys(&self) -> Vec<String>;

    /// Remove every key starting with `prefix`. Returns how many were removed.
    fn remove_prefixed(&mut self, prefix: &str) -> Result<usize, String> {
        let doomed: Vec<String> = self
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect();
        for key in &doomed {
            self.remove(key)?;
        }
        Ok(doomed.len())
    }
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, String> {
        (**self).try_get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), String> {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Process-lifetime store. Used for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), String> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}
