use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{KVError, KVStore};

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryKv {
  entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryKv {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.read().map(|entries| entries.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

fn poisoned<T>(_: T) -> KVError {
  KVError::Storage("memory store lock poisoned".to_string())
}

impl KVStore for MemoryKv {
  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
    let entries = self.entries.read().map_err(poisoned)?;
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
    let mut entries = self.entries.write().map_err(poisoned)?;
    entries.insert(key.to_string(), value.to_vec());
    Ok(())
  }

  fn delete(&self, key: &str) -> Result<(), KVError> {
    let mut entries = self.entries.write().map_err(poisoned)?;
    entries.remove(key);
    Ok(())
  }
}
