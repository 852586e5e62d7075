use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::browse::{filter_and_sort, search_name_or_code, BuiltFilter, CollectionStats, SortOptions};
use crate::error::{Result, TrackerError};
use crate::kv::KVStore;
use crate::lists::{ListStore, COLLECTION_KEY, WISHLIST_KEY};
use crate::model::CatalogRecord;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ListKind {
  Collection,
  Wishlist,
}

impl ListKind {
  pub fn key(&self) -> &'static str {
    match self {
      ListKind::Collection => COLLECTION_KEY,
      ListKind::Wishlist => WISHLIST_KEY,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      ListKind::Collection => "collection",
      ListKind::Wishlist => "wishlist",
    }
  }
}

/// What the presentation layer holds: the parsed catalog and the device store.
#[derive(Clone)]
pub struct AppState {
  pub catalog: Arc<Vec<CatalogRecord>>,
  pub store: Arc<dyn KVStore>,
}

impl AppState {
  pub fn new(catalog: Vec<CatalogRecord>, store: Arc<dyn KVStore>) -> Self {
    Self {
      catalog: Arc::new(catalog),
      store,
    }
  }

  pub fn list(&self, kind: ListKind) -> ListStore<Arc<dyn KVStore>> {
    ListStore::new(self.store.clone(), kind.key())
  }
}

/// How a personal list should be narrowed down for display.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
  pub query: String,
  /// None keeps the order entries were added in.
  pub sort: Option<SortOptions>,
  pub built: BuiltFilter,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
  pub in_collection: bool,
  pub in_wishlist: bool,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HomeSummary {
  pub catalog_sets: usize,
  pub collection: CollectionStats,
  pub wishlist_sets: usize,
}

pub fn browse_catalog(state: &AppState, query: &str, options: &SortOptions) -> Vec<CatalogRecord> {
  filter_and_sort(&state.catalog, query, options)
}

pub fn find_set(state: &AppState, set_num: &str) -> Result<CatalogRecord> {
  let normalized = set_num.trim();
  state
    .catalog
    .iter()
    .find(|record| record.set_num == normalized)
    .cloned()
    .ok_or_else(|| TrackerError::UnknownSet(normalized.to_string()))
}

pub fn get_list(state: &AppState, kind: ListKind, request: &ListQuery) -> Vec<CatalogRecord> {
  let records = state.list(kind).load();
  let narrowed = match &request.sort {
    Some(options) => filter_and_sort(&records, &request.query, options),
    None => search_name_or_code(&records, &request.query),
  };
  request.built.apply(narrowed)
}

/// Copy a catalog set into a personal list. Returns false if it was already there.
pub fn add_to_list(state: &AppState, kind: ListKind, set_num: &str) -> Result<bool> {
  let record = find_set(state, set_num)?;
  let added = state.list(kind).add(&record)?;
  if added {
    info!("Added {} to {}", record.set_num, kind.label());
  }
  Ok(added)
}

pub fn remove_from_list(state: &AppState, kind: ListKind, set_num: &str) -> Result<bool> {
  let removed = state.list(kind).remove(set_num.trim())?;
  if removed {
    info!("Removed {} from {}", set_num.trim(), kind.label());
  }
  Ok(removed)
}

/// Built state only exists for owned sets.
pub fn toggle_built(state: &AppState, set_num: &str) -> Result<bool> {
  let kind = ListKind::Collection;
  state
    .list(kind)
    .toggle_built(set_num.trim())?
    .ok_or_else(|| TrackerError::NotInList {
      set_num: set_num.trim().to_string(),
      list: kind.label(),
    })
}

pub fn toggle_favorite(state: &AppState, kind: ListKind, set_num: &str) -> Result<bool> {
  state
    .list(kind)
    .toggle_favorite(set_num.trim())?
    .ok_or_else(|| TrackerError::NotInList {
      set_num: set_num.trim().to_string(),
      list: kind.label(),
    })
}

pub fn list_membership(state: &AppState, set_num: &str) -> Membership {
  let set_num = set_num.trim();
  Membership {
    in_collection: state.list(ListKind::Collection).contains(set_num),
    in_wishlist: state.list(ListKind::Wishlist).contains(set_num),
  }
}

pub fn home_summary(state: &AppState) -> HomeSummary {
  HomeSummary {
    catalog_sets: state.catalog.len(),
    collection: CollectionStats::from_records(&state.list(ListKind::Collection).load()),
    wishlist_sets: state.list(ListKind::Wishlist).load().len(),
  }
}
