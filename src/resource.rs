use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResourceError {
  #[error("resource not found: {0}")]
  NotFound(String),

  #[error("failed to read resource {name}: {source}")]
  Io {
    name: String,
    #[source]
    source: io::Error,
  },
}

/// Supplies bundled text resources by logical name (`sets` → `sets.csv`).
pub trait ResourceLoader: Send + Sync {
  fn read_text(&self, name: &str) -> Result<String, ResourceError>;
}

/// Resources shipped as files in a directory next to the application.
pub struct BundleDir {
  root: PathBuf,
}

impl BundleDir {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn path_for(&self, name: &str) -> PathBuf {
    self.root.join(format!("{}.csv", name))
  }
}

impl ResourceLoader for BundleDir {
  fn read_text(&self, name: &str) -> Result<String, ResourceError> {
    let path = self.path_for(name);
    if !path.is_file() {
      return Err(ResourceError::NotFound(path.display().to_string()));
    }
    fs::read_to_string(&path).map_err(|source| ResourceError::Io {
      name: path.display().to_string(),
      source,
    })
  }
}

/// In-memory resources, for tests and embedded catalogs.
#[derive(Default)]
pub struct StaticResources {
  entries: HashMap<String, String>,
}

impl StaticResources {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, name: &str, text: &str) -> Self {
    self.entries.insert(name.to_string(), text.to_string());
    self
  }
}

impl ResourceLoader for StaticResources {
  fn read_text(&self, name: &str) -> Result<String, ResourceError> {
    self
      .entries
      .get(name)
      .cloned()
      .ok_or_else(|| ResourceError::NotFound(name.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundle_dir_reads_named_csv() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sets.csv"), "set_num,name\n").unwrap();

    let bundle = BundleDir::new(dir.path());
    assert_eq!(bundle.read_text("sets").unwrap(), "set_num,name\n");
  }

  #[test]
  fn bundle_dir_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = BundleDir::new(dir.path());
    assert!(matches!(bundle.read_text("sets"), Err(ResourceError::NotFound(_))));
  }

  #[test]
  fn static_resources_lookup() {
    let resources = StaticResources::new().with("sets", "header\n");
    assert_eq!(resources.read_text("sets").unwrap(), "header\n");
    assert!(resources.read_text("themes").is_err());
  }

  #[test]
  fn resource_names_map_to_csv_files() {
    let bundle = BundleDir::new("/bundle");
    assert_eq!(bundle.path_for("sets"), PathBuf::from("/bundle/sets.csv"));
  }
}
