pub mod browse;
pub mod commands;
pub mod config;
pub mod csv;
pub mod error;
pub mod kv;
pub mod lists;
pub mod loader;
pub mod model;
pub mod resource;

use std::sync::Arc;

use log::info;

pub use browse::{BuiltFilter, CollectionStats, SortCriteria, SortOptions};
pub use commands::{AppState, ListKind, ListQuery};
pub use config::{AppConfig, ConfigOverrides};
pub use error::TrackerError;
pub use kv::{KVError, KVStore, MemoryKv, SqliteKv};
pub use lists::ListStore;
pub use model::{CatalogRecord, CatalogSchema, Classification};
pub use resource::{BundleDir, ResourceLoader, StaticResources};

/// Open the device store and load the bundled catalog on a worker thread.
pub fn init_state(config: &AppConfig) -> error::Result<AppState> {
  let resources: Arc<dyn ResourceLoader> = Arc::new(BundleDir::new(config.catalog_dir.clone()));
  let pending = loader::spawn_catalog_load(resources, &config.catalog_name, config.schema);

  let store = SqliteKv::open(&config.db_path)?;
  info!("Using store at {}", store.path().display());

  let catalog = pending.wait();
  Ok(AppState::new(catalog, Arc::new(store)))
}
