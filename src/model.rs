use std::fmt;

use serde::{Deserialize, Serialize};

/// Theme classification of a set. Older catalogs carry a numeric theme id,
/// newer exports carry the theme name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
  ById(i64),
  ByName(String),
}

impl Default for Classification {
  fn default() -> Self {
    Classification::ById(0)
  }
}

impl fmt::Display for Classification {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Classification::ById(id) => write!(f, "#{}", id),
      Classification::ByName(name) => f.write_str(name),
    }
  }
}

/// One set from the catalog, or a copy of one held in a personal list.
///
/// Catalog rows are never mutated. `is_favorite` and `is_built` only change on
/// the copies owned by the collection or the wishlist.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
  pub set_num: String,
  pub name: String,
  pub year: i64,
  pub theme: Classification,
  pub num_parts: i64,
  pub img_url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instructions_url: Option<String>,
  #[serde(default)]
  pub is_favorite: bool,
  #[serde(default)]
  pub is_built: bool,
}

impl CatalogRecord {
  /// Set number without the variant suffix: `7140-1` displays as `7140`.
  pub fn short_code(&self) -> &str {
    match self.set_num.find('-') {
      Some(dash) => &self.set_num[..dash],
      None => &self.set_num,
    }
  }

  pub fn has_instructions(&self) -> bool {
    self
      .instructions_url
      .as_deref()
      .is_some_and(|url| !url.is_empty())
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnLayout {
  /// set_num, name, year, theme, num_parts, img_url
  Legacy,
  /// Legacy columns plus instructions_url.
  Current,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeColumn {
  Id,
  Name,
}

/// Row layout of a catalog export, fixed before parsing starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogSchema {
  pub columns: ColumnLayout,
  pub theme: ThemeColumn,
}

impl Default for CatalogSchema {
  fn default() -> Self {
    CatalogSchema {
      columns: ColumnLayout::Current,
      theme: ThemeColumn::Id,
    }
  }
}

impl CatalogSchema {
  pub const LEGACY: CatalogSchema = CatalogSchema {
    columns: ColumnLayout::Legacy,
    theme: ThemeColumn::Id,
  };

  pub fn expected_fields(&self) -> usize {
    match self.columns {
      ColumnLayout::Legacy => 6,
      ColumnLayout::Current => 7,
    }
  }

  /// Guess the layout from a header row such as
  /// `set_num,name,year,theme_id,num_parts,img_url,instructions_url`.
  pub fn from_header(header: &str) -> CatalogSchema {
    let columns: Vec<String> = crate::csv::split_row(header)
      .into_iter()
      .map(|column| column.trim().to_lowercase())
      .collect();

    let layout = if columns.len() == 6 {
      ColumnLayout::Legacy
    } else {
      ColumnLayout::Current
    };
    let theme = match columns.get(3).map(String::as_str) {
      Some("theme") | Some("theme_name") => ThemeColumn::Name,
      _ => ThemeColumn::Id,
    };

    CatalogSchema {
      columns: layout,
      theme,
    }
  }
}
