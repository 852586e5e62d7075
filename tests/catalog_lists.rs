use std::fs;
use std::sync::Arc;

use collection_tracker::commands::{self, ListKind, ListQuery};
use collection_tracker::csv::{load_catalog, parse_catalog};
use collection_tracker::lists::{ListStore, WISHLIST_KEY};
use collection_tracker::{
  init_state, AppConfig, AppState, BundleDir, CatalogSchema, ConfigOverrides, KVStore, SortCriteria,
  SortOptions, SqliteKv,
};

const SIX_COLUMN: &str = "num,name,year,cat,parts,img\n7140-1,X-wing,1999,50,219,http://x\nbadrow,onlythree\n8092-1,Walker,2010,60,250,http://y";

#[test]
fn malformed_row_is_skipped() {
  let records: Vec<_> = parse_catalog(SIX_COLUMN, CatalogSchema::LEGACY).collect();
  let codes: Vec<&str> = records.iter().map(|r| r.set_num.as_str()).collect();
  assert_eq!(codes, vec!["7140-1", "8092-1"]);
}

#[test]
fn bundled_catalog_parses_completely() {
  let bundle = BundleDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/resources"));
  let records = load_catalog(&bundle, "sets", None);
  assert_eq!(records.len(), 11);

  let falcon = records.iter().find(|r| r.set_num == "10179-1").unwrap();
  assert_eq!(falcon.name, "Millennium Falcon, Ultimate Collector's Series");
  assert_eq!(falcon.short_code(), "10179");
}

#[test]
fn lists_persist_across_store_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let db_path = dir.path().join("collection.db");
  let records: Vec<_> = parse_catalog(SIX_COLUMN, CatalogSchema::LEGACY).collect();

  {
    let state = AppState::new(records.clone(), Arc::new(SqliteKv::open(&db_path).unwrap()));
    commands::add_to_list(&state, ListKind::Wishlist, "8092-1").unwrap();
    commands::add_to_list(&state, ListKind::Wishlist, "8092-1").unwrap();
    commands::add_to_list(&state, ListKind::Collection, "7140-1").unwrap();
    commands::toggle_built(&state, "7140-1").unwrap();
  }

  let state = AppState::new(records, Arc::new(SqliteKv::open(&db_path).unwrap()));
  let wishlist = commands::get_list(&state, ListKind::Wishlist, &ListQuery::default());
  assert_eq!(wishlist.len(), 1);
  assert_eq!(wishlist[0].set_num, "8092-1");

  let collection = commands::get_list(&state, ListKind::Collection, &ListQuery::default());
  assert!(collection[0].is_built);
}

#[test]
fn sqlite_round_trip_keeps_bytes() {
  let dir = tempfile::tempdir().unwrap();
  let kv = Arc::new(SqliteKv::open(&dir.path().join("collection.db")).unwrap());
  let wishlist = ListStore::wishlist(kv.clone());
  for record in parse_catalog(SIX_COLUMN, CatalogSchema::LEGACY) {
    wishlist.add(&record).unwrap();
  }

  let before = kv.get(WISHLIST_KEY).unwrap().unwrap();
  wishlist.save(&wishlist.load()).unwrap();
  assert_eq!(kv.get(WISHLIST_KEY).unwrap().unwrap(), before);
}

#[test]
fn init_state_with_missing_catalog_is_empty() {
  let dir = tempfile::tempdir().unwrap();
  let overrides = ConfigOverrides {
    data_dir: Some(dir.path().join("data")),
    catalog_dir: Some(dir.path().join("no-such-dir")),
    ..ConfigOverrides::default()
  };
  let config = AppConfig::resolve_with(overrides, |_| None).unwrap();

  let state = init_state(&config).unwrap();
  assert!(state.catalog.is_empty());
  assert!(config.db_path.exists());
}

#[test]
fn init_state_loads_catalog_from_directory() {
  let dir = tempfile::tempdir().unwrap();
  let catalog_dir = dir.path().join("bundle");
  fs::create_dir_all(&catalog_dir).unwrap();
  fs::write(catalog_dir.join("sets.csv"), SIX_COLUMN).unwrap();

  let overrides = ConfigOverrides {
    data_dir: Some(dir.path().join("data")),
    catalog_dir: Some(catalog_dir),
    ..ConfigOverrides::default()
  };
  let config = AppConfig::resolve_with(overrides, |_| None).unwrap();
  let state = init_state(&config).unwrap();

  let newest_first = SortOptions::new(SortCriteria::Year, false);
  let records = commands::browse_catalog(&state, "", &newest_first);
  let codes: Vec<&str> = records.iter().map(|r| r.set_num.as_str()).collect();
  assert_eq!(codes, vec!["8092-1", "7140-1"]);
}
