// Durable key-value store using SQLite

use std::fs;
use std::path::Path;

use log::{error, warn};
use rusqlite::{params, Connection, OptionalExtension};

use alignchart_engine::store::KvStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// `KvStore` backed by a single SQLite table.
///
/// Every write is its own statement, so the grid snapshot lands atomically.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
        }
        let conn = Connection::open(path).map_err(|e| e.to_string())?;
        Self::init(conn)
    }

    /// Store that vanishes with the process.
    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory().map_err(|e| e.to_string())?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, String> {
        conn.execute_batch(SCHEMA).map_err(|e| e.to_string())?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Option<String> {
        self.try_get(key).unwrap_or_else(|e| {
            error!("Failed to read '{}' from store: {}", key, e);
            None
        })
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, String> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .map_err(|e| e.to_string())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), String> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let collect = || -> rusqlite::Result<Vec<String>> {
            let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        };
        collect().unwrap_or_else(|e| {
            warn!("Failed to list store keys: {}", e);
            Vec::new()
        })
    }

    fn remove_prefixed(&mut self, prefix: &str) -> Result<usize, String> {
        // substr rather than LIKE: '_' in "cell_" is a LIKE wildcard.
        self.conn
            .execute(
                "DELETE FROM kv WHERE substr(key, 1, length(?1)) = ?1",
                params![prefix],
            )
            .map_err(|e| e.to_string())
    }
}
