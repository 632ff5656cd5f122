//! SQLite backend: a single `kv` table in a local file.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::client::{Backend, StoreError, StoreResult};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);";

pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open (or create) a store file. `:memory:` opens a private in-memory database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let mut conn = if path.as_os_str() == ":memory:" {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
                }
            }
            Connection::open(path)?
        };
        run_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::open(Path::new(":memory:"))
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::OperationFailed("SQLite connection lock poisoned".to_string()))
    }
}

fn run_migrations(conn: &mut Connection) -> StoreResult<()> {
    let migrations = Migrations::new(vec![M::up(SCHEMA)]);
    migrations
        .to_latest(conn)
        .map_err(|e| StoreError::Migration(e.to_string()))
}

#[async_trait]
impl Backend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.set("contracts", "[1]").await.unwrap();
        backend.set("contracts", "[1,2]").await.unwrap();
        assert_eq!(backend.get("contracts").await.unwrap().as_deref(), Some("[1,2]"));
        assert!(backend.get("projects").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_and_keys() {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.set("b", "1").await.unwrap();
        backend.set("a", "2").await.unwrap();
        assert_eq!(backend.keys().await.unwrap(), vec!["a", "b"]);

        backend.remove("a").await.unwrap();
        assert_eq!(backend.keys().await.unwrap(), vec!["b"]);
    }
}
