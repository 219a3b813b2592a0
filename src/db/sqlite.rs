use super::{SecretStore, StoreError};
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "songauth.db";

/// Key/value store backed by a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens `songauth.db` in the platform data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        let data_dir = data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::open(data_dir.join(DB_FILE_NAME))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StoreError::Unavailable(format!("failed to open {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "opened secret store");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS secrets (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }
}

impl SecretStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM secrets WHERE key = ?1",
                [key],
                |row: &rusqlite::Row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let json = serde_json::to_string(&value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO secrets (key, value) VALUES (?1, ?2)",
            [key, json.as_str()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM secrets WHERE key = ?1", [key])?;
        Ok(())
    }
}

fn data_dir() -> Option<PathBuf> {
    let dir = dirs::data_dir()
        .map(|base| base.join("songauth"))
        .or_else(|| dirs::home_dir().map(|home| home.join(".songauth")))?;
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
