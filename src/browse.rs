use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::CatalogRecord;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortCriteria {
  #[default]
  Name,
  SetNumber,
  Year,
  Parts,
}

impl SortCriteria {
  pub fn label(&self) -> &'static str {
    match self {
      SortCriteria::Name => "Name",
      SortCriteria::SetNumber => "Set Number",
      SortCriteria::Year => "Year",
      SortCriteria::Parts => "Parts",
    }
  }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SortOptions {
  pub criteria: SortCriteria,
  pub ascending: bool,
}

impl Default for SortOptions {
  fn default() -> Self {
    SortOptions {
      criteria: SortCriteria::Name,
      ascending: true,
    }
  }
}

impl SortOptions {
  pub fn new(criteria: SortCriteria, ascending: bool) -> Self {
    SortOptions { criteria, ascending }
  }
}

pub fn direction_label(options: &SortOptions) -> &'static str {
  match (options.criteria, options.ascending) {
    (SortCriteria::Name | SortCriteria::SetNumber, true) => "A-Z",
    (SortCriteria::Name | SortCriteria::SetNumber, false) => "Z-A",
    (SortCriteria::Year, true) => "Oldest",
    (SortCriteria::Year, false) => "Newest",
    (SortCriteria::Parts, true) => "Fewest",
    (SortCriteria::Parts, false) => "Most",
  }
}

/// Icon token shown next to the direction label.
pub fn direction_icon(options: &SortOptions) -> &'static str {
  match (options.criteria, options.ascending) {
    (SortCriteria::Name | SortCriteria::SetNumber, true) => "arrow.up",
    (SortCriteria::Name | SortCriteria::SetNumber, false) => "arrow.down",
    (SortCriteria::Year, true) => "calendar.badge.clock",
    (SortCriteria::Year, false) => "calendar.badge.plus",
    (SortCriteria::Parts, true) => "minus.circle",
    (SortCriteria::Parts, false) => "plus.circle",
  }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
  haystack.to_lowercase().contains(needle_lower)
}

/// Case-insensitive ordering by lowercase code points. Accented letters sort
/// after the ASCII range, so "Éclair" follows "Zamor".
fn compare_ignore_case(a: &str, b: &str) -> Ordering {
  a.to_lowercase().cmp(&b.to_lowercase())
}

fn matches_query(record: &CatalogRecord, query_lower: &str, criteria: SortCriteria) -> bool {
  match criteria {
    SortCriteria::Name => contains_ignore_case(&record.name, query_lower),
    SortCriteria::SetNumber => contains_ignore_case(&record.set_num, query_lower),
    // Numeric criteria have no text column of their own.
    SortCriteria::Year | SortCriteria::Parts => {
      contains_ignore_case(&record.name, query_lower)
        || contains_ignore_case(&record.set_num, query_lower)
    }
  }
}

/// Filter by `query` against the field selected by `options.criteria`, then sort
/// by that field. Only an empty query matches everything; whitespace is searched
/// for literally. Equal keys keep their input order.
pub fn filter_and_sort(
  records: &[CatalogRecord],
  query: &str,
  options: &SortOptions,
) -> Vec<CatalogRecord> {
  let query_lower = query.to_lowercase();
  let mut filtered: Vec<CatalogRecord> = records
    .iter()
    .filter(|record| query_lower.is_empty() || matches_query(record, &query_lower, options.criteria))
    .cloned()
    .collect();

  filtered.sort_by(|a, b| {
    let ordering = match options.criteria {
      SortCriteria::Name => compare_ignore_case(&a.name, &b.name),
      SortCriteria::SetNumber => compare_ignore_case(&a.set_num, &b.set_num),
      SortCriteria::Year => a.year.cmp(&b.year),
      SortCriteria::Parts => a.num_parts.cmp(&b.num_parts),
    };
    if options.ascending {
      ordering
    } else {
      ordering.reverse()
    }
  });

  filtered
}

/// Wishlist search: name or set number, input order preserved.
pub fn search_name_or_code(records: &[CatalogRecord], query: &str) -> Vec<CatalogRecord> {
  let query_lower = query.to_lowercase();
  if query_lower.is_empty() {
    return records.to_vec();
  }
  records
    .iter()
    .filter(|record| {
      contains_ignore_case(&record.name, &query_lower)
        || contains_ignore_case(&record.set_num, &query_lower)
    })
    .cloned()
    .collect()
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum BuiltFilter {
  #[default]
  All,
  Built,
  Unbuilt,
}

impl BuiltFilter {
  pub fn apply(&self, records: Vec<CatalogRecord>) -> Vec<CatalogRecord> {
    match self {
      BuiltFilter::All => records,
      BuiltFilter::Built => records.into_iter().filter(|r| r.is_built).collect(),
      BuiltFilter::Unbuilt => records.into_iter().filter(|r| !r.is_built).collect(),
    }
  }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
  pub total: usize,
  pub built: usize,
  pub unbuilt: usize,
  pub favorites: usize,
  pub total_parts: i64,
}

impl CollectionStats {
  pub fn from_records(records: &[CatalogRecord]) -> Self {
    let mut stats = CollectionStats {
      total: records.len(),
      ..CollectionStats::default()
    };
    for record in records {
      if record.is_built {
        stats.built += 1;
      } else {
        stats.unbuilt += 1;
      }
      if record.is_favorite {
        stats.favorites += 1;
      }
      stats.total_parts += record.num_parts.max(0);
    }
    stats
  }
}
