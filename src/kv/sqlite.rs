use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{KVError, KVStore};

const MIGRATION_SQL_0001: &str = include_str!("../../migrations/0001_kv_entries.sql");

fn now_iso() -> String {
  Utc::now().to_rfc3339()
}

fn storage_error(e: impl ToString) -> KVError {
  KVError::Storage(e.to_string())
}

/// SQLite-backed store. Each call opens its own connection, so the store can
/// be shared between threads without holding a connection.
#[derive(Clone, Debug)]
pub struct SqliteKv {
  db_path: PathBuf,
}

impl SqliteKv {
  /// Create the database (and its parent directory) if needed and apply the schema.
  pub fn open(db_path: &Path) -> Result<Self, KVError> {
    if let Some(parent) = db_path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).map_err(storage_error)?;
      }
    }

    let connection = Connection::open(db_path).map_err(storage_error)?;
    connection
      .execute_batch(MIGRATION_SQL_0001)
      .map_err(storage_error)?;

    Ok(Self {
      db_path: db_path.to_path_buf(),
    })
  }

  pub fn path(&self) -> &Path {
    &self.db_path
  }

  fn connect(&self) -> Result<Connection, KVError> {
    Connection::open(&self.db_path).map_err(storage_error)
  }
}

impl KVStore for SqliteKv {
  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
    let connection = self.connect()?;
    connection
      .query_row(
        "SELECT value FROM kv_entries WHERE key = ?1 LIMIT 1",
        params![key],
        |row| row.get::<usize, Vec<u8>>(0),
      )
      .optional()
      .map_err(storage_error)
  }

  fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
    let connection = self.connect()?;
    connection
      .execute(
        "INSERT INTO kv_entries (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           updated_at = excluded.updated_at",
        params![key, value, now_iso()],
      )
      .map_err(storage_error)?;
    Ok(())
  }

  fn delete(&self, key: &str) -> Result<(), KVError> {
    let connection = self.connect()?;
    connection
      .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])
      .map_err(storage_error)?;
    Ok(())
  }
}
