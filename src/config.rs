use std::env;
use std::path::PathBuf;

use log::debug;

use crate::error::{Result, TrackerError};
use crate::model::{CatalogSchema, ColumnLayout, ThemeColumn};

pub const APP_DIR_NAME: &str = "collection-tracker";
pub const DB_FILE_NAME: &str = "collection.db";
pub const CATALOG_NAME_DEFAULT: &str = "sets";
pub const DATA_DIR_ENV: &str = "COLLECTION_TRACKER_DATA_DIR";
pub const CATALOG_DIR_ENV: &str = "COLLECTION_TRACKER_CATALOG_DIR";

/// Values supplied on the command line. Unset fields fall back to the
/// environment, then to defaults.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
  pub data_dir: Option<PathBuf>,
  pub catalog_dir: Option<PathBuf>,
  pub catalog_name: Option<String>,
  pub columns: Option<usize>,
  pub theme: Option<ThemeColumn>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
  pub data_dir: PathBuf,
  pub db_path: PathBuf,
  pub catalog_dir: PathBuf,
  pub catalog_name: String,
  /// None: take the layout from the catalog header.
  pub schema: Option<CatalogSchema>,
}

fn default_data_dir() -> PathBuf {
  dirs::data_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join(APP_DIR_NAME)
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
  pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
    Self::resolve_with(overrides, |name| env::var(name).ok())
  }

  /// Like `resolve`, with the environment lookup supplied by the caller.
  pub fn resolve_with(
    overrides: ConfigOverrides,
    lookup_env: impl Fn(&str) -> Option<String>,
  ) -> Result<Self> {
    let data_dir = overrides
      .data_dir
      .or_else(|| non_empty(lookup_env(DATA_DIR_ENV)).map(PathBuf::from))
      .unwrap_or_else(default_data_dir);
    let catalog_dir = overrides
      .catalog_dir
      .or_else(|| non_empty(lookup_env(CATALOG_DIR_ENV)).map(PathBuf::from))
      .unwrap_or_else(|| PathBuf::from("resources"));
    let catalog_name = non_empty(overrides.catalog_name)
      .unwrap_or_else(|| CATALOG_NAME_DEFAULT.to_string());

    let columns = match overrides.columns {
      None => None,
      Some(6) => Some(ColumnLayout::Legacy),
      Some(7) => Some(ColumnLayout::Current),
      Some(other) => {
        return Err(TrackerError::Config(format!(
          "catalog must have 6 or 7 columns, got {}",
          other
        )))
      }
    };
    let schema = if columns.is_none() && overrides.theme.is_none() {
      None
    } else {
      let defaults = CatalogSchema::default();
      Some(CatalogSchema {
        columns: columns.unwrap_or(defaults.columns),
        theme: overrides.theme.unwrap_or(defaults.theme),
      })
    };

    let config = AppConfig {
      db_path: data_dir.join(DB_FILE_NAME),
      data_dir,
      catalog_dir,
      catalog_name,
      schema,
    };
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
  }
}
