pub mod memory;
pub mod sqlite;

use thiserror::Error;

pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

#[derive(Error, Debug)]
pub enum KVError {
  #[error("storage error: {0}")]
  Storage(String),

  #[error("serialization error: {0}")]
  Serialization(String),
}

/// Device-local key-value persistence. Values are opaque byte blobs.
pub trait KVStore: Send + Sync {
  /// Get the value for a key. Returns None if the key does not exist.
  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

  /// Set a key, replacing any previous value.
  fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

  /// Delete a key. Deleting a missing key is not an error.
  fn delete(&self, key: &str) -> Result<(), KVError>;
}

impl<S: KVStore + ?Sized> KVStore for std::sync::Arc<S> {
  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
    (**self).get(key)
  }

  fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
    (**self).set(key, value)
  }

  fn delete(&self, key: &str) -> Result<(), KVError> {
    (**self).delete(key)
  }
}
