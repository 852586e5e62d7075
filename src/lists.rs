use log::{debug, warn};

use crate::kv::{KVError, KVStore};
use crate::model::CatalogRecord;

pub const WISHLIST_KEY: &str = "userWishlist";
pub const COLLECTION_KEY: &str = "userCollection";

/// A personal list of sets persisted as one JSON blob under `key`.
///
/// Every mutation reloads the whole list, changes it and writes it back. Entries
/// are unique by set number.
pub struct ListStore<S: KVStore> {
  store: S,
  key: String,
}

impl<S: KVStore> ListStore<S> {
  pub fn new(store: S, key: &str) -> Self {
    Self {
      store,
      key: key.to_string(),
    }
  }

  pub fn wishlist(store: S) -> Self {
    Self::new(store, WISHLIST_KEY)
  }

  pub fn collection(store: S) -> Self {
    Self::new(store, COLLECTION_KEY)
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  /// Stored entries, or an empty list when nothing is stored, the store cannot
  /// be read, or the blob cannot be decoded.
  pub fn load(&self) -> Vec<CatalogRecord> {
    self.try_load().unwrap_or_else(|e| {
      warn!("Could not read list '{}': {}", self.key, e);
      Vec::new()
    })
  }

  /// Like `load`, but a failed read is returned instead of reading as empty.
  /// Mutations go through here so they never overwrite entries they could not see.
  fn try_load(&self) -> Result<Vec<CatalogRecord>, KVError> {
    let Some(data) = self.store.get(&self.key)? else {
      return Ok(Vec::new());
    };

    match serde_json::from_slice::<Vec<CatalogRecord>>(&data) {
      Ok(records) => Ok(records),
      Err(e) => {
        warn!("Discarding undecodable list '{}': {}", self.key, e);
        Ok(Vec::new())
      }
    }
  }

  pub fn save(&self, records: &[CatalogRecord]) -> Result<(), KVError> {
    let encoded =
      serde_json::to_vec(records).map_err(|e| KVError::Serialization(e.to_string()))?;
    self.store.set(&self.key, &encoded)?;
    debug!("Saved {} entries to list '{}'", records.len(), self.key);
    Ok(())
  }

  /// Append a copy of `record` unless an entry with its set number exists.
  /// Returns whether the list changed.
  pub fn add(&self, record: &CatalogRecord) -> Result<bool, KVError> {
    let mut records = self.try_load()?;
    if records.iter().any(|r| r.set_num == record.set_num) {
      return Ok(false);
    }
    records.push(record.clone());
    self.save(&records)?;
    Ok(true)
  }

  /// Remove every entry with `set_num`. Returns whether anything was removed.
  pub fn remove(&self, set_num: &str) -> Result<bool, KVError> {
    let mut records = self.try_load()?;
    let before = records.len();
    records.retain(|r| r.set_num != set_num);
    let removed = records.len() != before;
    self.save(&records)?;
    Ok(removed)
  }

  pub fn contains(&self, set_num: &str) -> bool {
    self.load().iter().any(|r| r.set_num == set_num)
  }

  pub fn get(&self, set_num: &str) -> Option<CatalogRecord> {
    self.load().into_iter().find(|r| r.set_num == set_num)
  }

  /// Flip `is_built` on the stored copy. Returns the new value, or None when
  /// the set is not in this list.
  pub fn toggle_built(&self, set_num: &str) -> Result<Option<bool>, KVError> {
    self.update(set_num, |record| {
      record.is_built = !record.is_built;
      record.is_built
    })
  }

  pub fn toggle_favorite(&self, set_num: &str) -> Result<Option<bool>, KVError> {
    self.update(set_num, |record| {
      record.is_favorite = !record.is_favorite;
      record.is_favorite
    })
  }

  fn update<T>(
    &self,
    set_num: &str,
    apply: impl FnOnce(&mut CatalogRecord) -> T,
  ) -> Result<Option<T>, KVError> {
    let mut records = self.try_load()?;
    let Some(record) = records.iter_mut().find(|r| r.set_num == set_num) else {
      return Ok(None);
    };
    let value = apply(record);
    self.save(&records)?;
    Ok(Some(value))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicBool, Ordering};
  use std::sync::Arc;

  use super::*;
  use crate::kv::MemoryKv;
  use crate::model::Classification;

  fn set(set_num: &str, name: &str) -> CatalogRecord {
    CatalogRecord {
      set_num: set_num.to_string(),
      name: name.to_string(),
      year: 1999,
      theme: Classification::ById(158),
      num_parts: 263,
      img_url: "http://img".to_string(),
      instructions_url: Some("http://pdf".to_string()),
      is_favorite: false,
      is_built: false,
    }
  }

  #[test]
  fn load_of_missing_key_is_empty() {
    let wishlist = ListStore::wishlist(MemoryKv::new());
    assert!(wishlist.load().is_empty());
    assert_eq!(wishlist.key(), WISHLIST_KEY);
  }

  #[test]
  fn add_is_unique_by_set_number() {
    let wishlist = ListStore::wishlist(MemoryKv::new());
    assert!(wishlist.add(&set("7140-1", "X-wing")).unwrap());
    assert_eq!(wishlist.load().len(), 1);

    assert!(!wishlist.add(&set("7140-1", "X-wing Fighter (reissue)")).unwrap());
    let stored = wishlist.load();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "X-wing");
  }

  #[test]
  fn remove_and_contains() {
    let collection = ListStore::collection(MemoryKv::new());
    collection.add(&set("7140-1", "X-wing")).unwrap();
    collection.add(&set("8092-1", "Walker")).unwrap();
    assert!(collection.contains("8092-1"));

    assert!(collection.remove("8092-1").unwrap());
    assert!(!collection.contains("8092-1"));
    assert!(!collection.remove("8092-1").unwrap());
    assert_eq!(collection.load().len(), 1);
  }

  #[test]
  fn remove_drops_every_duplicate() {
    let collection = ListStore::collection(MemoryKv::new());
    collection
      .save(&[set("7140-1", "a"), set("8092-1", "b"), set("7140-1", "c")])
      .unwrap();
    assert!(collection.remove("7140-1").unwrap());
    assert_eq!(collection.load().len(), 1);
  }

  #[test]
  fn save_of_load_is_byte_identical() {
    let kv = Arc::new(MemoryKv::new());
    let wishlist = ListStore::wishlist(kv.clone());
    wishlist.add(&set("7140-1", "X-wing")).unwrap();
    wishlist.add(&set("8092-1", "Walker")).unwrap();

    let before = kv.get(WISHLIST_KEY).unwrap();
    wishlist.save(&wishlist.load()).unwrap();
    assert_eq!(kv.get(WISHLIST_KEY).unwrap(), before);
  }

  #[test]
  fn corrupt_blob_reads_as_empty() {
    let kv = Arc::new(MemoryKv::new());
    kv.set(COLLECTION_KEY, b"{not json").unwrap();

    let collection = ListStore::collection(kv.clone());
    assert!(collection.load().is_empty());

    // The next mutation starts over from an empty list.
    assert!(collection.add(&set("7140-1", "X-wing")).unwrap());
    assert_eq!(collection.load().len(), 1);
  }

  #[test]
  fn toggles_only_touch_one_list() {
    let kv = Arc::new(MemoryKv::new());
    let collection = ListStore::collection(kv.clone());
    let wishlist = ListStore::wishlist(kv.clone());
    let x_wing = set("7140-1", "X-wing");
    collection.add(&x_wing).unwrap();
    wishlist.add(&x_wing).unwrap();

    assert_eq!(collection.toggle_built("7140-1").unwrap(), Some(true));
    assert_eq!(wishlist.toggle_favorite("7140-1").unwrap(), Some(true));

    let owned = collection.get("7140-1").unwrap();
    assert!(owned.is_built);
    assert!(!owned.is_favorite);
    let wanted = wishlist.get("7140-1").unwrap();
    assert!(!wanted.is_built);
    assert!(wanted.is_favorite);
    assert!(!x_wing.is_built);

    assert_eq!(collection.toggle_built("7140-1").unwrap(), Some(false));
    assert_eq!(collection.toggle_built("0000-1").unwrap(), None);
  }

  /// Fails the next `get` once, then behaves like the wrapped store.
  struct FlakyReads {
    inner: MemoryKv,
    fail_next_get: AtomicBool,
  }

  impl KVStore for FlakyReads {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
      if self.fail_next_get.swap(false, Ordering::SeqCst) {
        return Err(KVError::Storage("database is locked".to_string()));
      }
      self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
      self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
      self.inner.delete(key)
    }
  }

  #[test]
  fn failed_read_does_not_wipe_stored_entries() {
    let kv = Arc::new(FlakyReads {
      inner: MemoryKv::new(),
      fail_next_get: AtomicBool::new(false),
    });
    let wishlist = ListStore::wishlist(kv.clone());
    wishlist.add(&set("1-1", "a")).unwrap();
    wishlist.add(&set("2-1", "b")).unwrap();

    kv.fail_next_get.store(true, Ordering::SeqCst);
    assert!(matches!(wishlist.add(&set("3-1", "c")), Err(KVError::Storage(_))));
    assert_eq!(wishlist.load().len(), 2);

    kv.fail_next_get.store(true, Ordering::SeqCst);
    assert!(wishlist.remove("1-1").is_err());
    kv.fail_next_get.store(true, Ordering::SeqCst);
    assert!(wishlist.toggle_favorite("1-1").is_err());

    let codes: Vec<String> = wishlist.load().into_iter().map(|r| r.set_num).collect();
    assert_eq!(codes, vec!["1-1", "2-1"]);
    assert!(!wishlist.get("1-1").unwrap().is_favorite);

    // A failed read through the soft path reads as empty and writes nothing.
    kv.fail_next_get.store(true, Ordering::SeqCst);
    assert!(wishlist.load().is_empty());
    assert_eq!(wishlist.load().len(), 2);
  }
}
