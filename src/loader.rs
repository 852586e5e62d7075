use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use log::{debug, error};

use crate::csv::load_catalog;
use crate::model::{CatalogRecord, CatalogSchema};
use crate::resource::ResourceLoader;

/// A catalog being parsed on a worker thread. The worker sends exactly once.
pub struct CatalogLoad {
  receiver: Receiver<Vec<CatalogRecord>>,
  done: bool,
}

/// Read and parse the catalog off the calling thread.
pub fn spawn_catalog_load(
  loader: Arc<dyn ResourceLoader>,
  name: &str,
  schema: Option<CatalogSchema>,
) -> CatalogLoad {
  let (sender, receiver) = mpsc::channel();
  let name = name.to_string();

  let spawned = thread::Builder::new()
    .name("catalog-load".to_string())
    .spawn(move || {
      let records = load_catalog(loader.as_ref(), &name, schema);
      debug!("Catalog worker finished with {} sets", records.len());
      // The receiver may already be gone; nothing to do then.
      let _ = sender.send(records);
    });

  if let Err(e) = spawned {
    error!("Could not start catalog worker: {}", e);
  }

  CatalogLoad {
    receiver,
    done: false,
  }
}

impl CatalogLoad {
  /// Block until the worker hands over the catalog. A worker that died without
  /// sending yields an empty catalog.
  pub fn wait(self) -> Vec<CatalogRecord> {
    if self.done {
      return Vec::new();
    }
    self.receiver.recv().unwrap_or_else(|_| {
      error!("Catalog worker exited without a result");
      Vec::new()
    })
  }

  /// Non-blocking poll. `Some` is returned once; later polls return None.
  pub fn try_take(&mut self) -> Option<Vec<CatalogRecord>> {
    if self.done {
      return None;
    }
    match self.receiver.try_recv() {
      Ok(records) => {
        self.done = true;
        Some(records)
      }
      Err(TryRecvError::Empty) => None,
      Err(TryRecvError::Disconnected) => {
        error!("Catalog worker exited without a result");
        self.done = true;
        Some(Vec::new())
      }
    }
  }
}
