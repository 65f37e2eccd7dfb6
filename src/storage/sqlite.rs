//! `SQLite`-backed key-value store

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

use super::KvStore;
use crate::paths;

/// Persistent store in a single `kv` table
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the store at the default location
    pub fn open() -> Result<Self> {
        let path = paths::database_path()?;
        Self::open_path(&path)
    }

    /// Open or create the store at a specific path
    pub fn open_path(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let conn = Connection::open(path).context("Failed to open database")?;
        let store = Self { conn };
        store.init()?;

        Ok(store)
    }

    /// Throwaway database that lives as long as the handle
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                ",
            )
            .context("Failed to initialize database schema")?;
        Ok(())
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to read key {key}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                   ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to write key {key}"))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to delete key {key}"))?;
        Ok(deleted > 0)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()
            .context("Failed to list keys")?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_init() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("test.sqlite");
        let _store = SqliteStore::open_path(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_kv_crud() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let mut store = SqliteStore::open_path(&path).unwrap();

        store.set("board", "[]").unwrap();
        store.set("board", "[1]").unwrap();
        store.set("another", "x").unwrap();
        assert_eq!(store.get("board").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.keys().unwrap(), vec!["another", "board"]);

        assert!(store.remove("board").unwrap());
        assert_eq!(store.get("board").unwrap(), None);
        assert!(!store.remove("board").unwrap());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        {
            let mut store = SqliteStore::open_path(&path).unwrap();
            store.set("k", "v").unwrap();
        }
        let store = SqliteStore::open_path(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_in_memory() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["k"]);
    }
}
