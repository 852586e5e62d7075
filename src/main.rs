use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::error;
use serde::Serialize;

use collection_tracker::browse::{direction_icon, direction_label};
use collection_tracker::commands::{self, HomeSummary};
use collection_tracker::error::Result;
use collection_tracker::model::ThemeColumn;
use collection_tracker::{
  init_state, AppConfig, AppState, BuiltFilter, CatalogRecord, ConfigOverrides, ListKind,
  ListQuery, SortCriteria, SortOptions,
};

#[derive(Parser)]
#[command(name = "collection-tracker")]
#[command(about = "Browse the set catalog and track your collection and wishlist", long_about = None)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Directory holding the collection database (overrides COLLECTION_TRACKER_DATA_DIR)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Directory holding the bundled catalog (overrides COLLECTION_TRACKER_CATALOG_DIR)
  #[arg(long, global = true)]
  catalog_dir: Option<PathBuf>,

  /// Catalog resource name, without the .csv extension
  #[arg(long, global = true)]
  catalog: Option<String>,

  /// Expected catalog columns; detected from the header when omitted
  #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(6..=7))]
  columns: Option<u8>,

  /// How the theme column is encoded
  #[arg(long, global = true, value_enum)]
  theme: Option<ThemeArg>,

  /// Print JSON instead of text
  #[arg(long, global = true)]
  json: bool,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Quiet mode: log only warnings/errors
  #[arg(short, long, global = true)]
  quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
  /// Search and sort the catalog
  Browse(BrowseArgs),
  /// Show one catalog set and which lists hold it
  Show { set_num: String },
  /// Sets you own
  #[command(subcommand)]
  Collection(CollectionCommand),
  /// Sets you want
  #[command(subcommand)]
  Wishlist(WishlistCommand),
  /// Collection and wishlist totals
  Stats,
}

#[derive(Args)]
struct BrowseArgs {
  /// Case-insensitive search text
  #[arg(default_value = "")]
  query: String,

  #[command(flatten)]
  sort: SortArgs,
}

#[derive(Args)]
struct SortArgs {
  #[arg(long, value_enum, default_value_t = SortArg::Name)]
  sort: SortArg,

  /// Sort descending (Z-A, newest, most pieces)
  #[arg(long)]
  desc: bool,
}

impl SortArgs {
  fn options(&self) -> SortOptions {
    SortOptions::new(self.sort.into(), !self.desc)
  }
}

#[derive(Subcommand)]
enum CollectionCommand {
  List {
    #[arg(default_value = "")]
    query: String,

    #[command(flatten)]
    sort: SortArgs,

    #[arg(long, value_enum, default_value_t = BuiltArg::All)]
    built: BuiltArg,
  },
  Add { set_num: String },
  Remove { set_num: String },
  ToggleBuilt { set_num: String },
  ToggleFavorite { set_num: String },
}

#[derive(Subcommand)]
enum WishlistCommand {
  /// Entries in the order they were added, optionally searched by name or number
  List {
    #[arg(default_value = "")]
    query: String,
  },
  Add { set_num: String },
  Remove { set_num: String },
  ToggleFavorite { set_num: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
  Name,
  SetNumber,
  Year,
  Parts,
}

impl From<SortArg> for SortCriteria {
  fn from(value: SortArg) -> Self {
    match value {
      SortArg::Name => SortCriteria::Name,
      SortArg::SetNumber => SortCriteria::SetNumber,
      SortArg::Year => SortCriteria::Year,
      SortArg::Parts => SortCriteria::Parts,
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum BuiltArg {
  All,
  Built,
  Unbuilt,
}

impl From<BuiltArg> for BuiltFilter {
  fn from(value: BuiltArg) -> Self {
    match value {
      BuiltArg::All => BuiltFilter::All,
      BuiltArg::Built => BuiltFilter::Built,
      BuiltArg::Unbuilt => BuiltFilter::Unbuilt,
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
  Id,
  Name,
}

impl From<ThemeArg> for ThemeColumn {
  fn from(value: ThemeArg) -> Self {
    match value {
      ThemeArg::Id => ThemeColumn::Id,
      ThemeArg::Name => ThemeColumn::Name,
    }
  }
}

fn init_logging(cli: &Cli) {
  let mut builder =
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
  if cli.quiet || cli.json {
    builder.filter_level(log::LevelFilter::Warn);
  } else if cli.verbose {
    builder.filter_level(log::LevelFilter::Debug);
  }
  builder.target(env_logger::Target::Stderr).init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn flags(record: &CatalogRecord) -> String {
  let mut flags = String::new();
  if record.is_favorite {
    flags.push_str(" ★");
  }
  if record.is_built {
    flags.push_str(" [built]");
  }
  flags
}

fn print_records(cli: &Cli, records: &[CatalogRecord]) -> Result<()> {
  if cli.json {
    return print_json(&records);
  }
  if records.is_empty() {
    println!("No sets found.");
    return Ok(());
  }
  for record in records {
    println!(
      "{:<8} {} ({}, {} pieces){}",
      record.short_code(),
      record.name,
      record.year,
      record.num_parts,
      flags(record)
    );
  }
  Ok(())
}

fn print_sort_header(cli: &Cli, options: &SortOptions) {
  if !cli.json {
    println!(
      "Sorted by {} ({}, {})",
      options.criteria.label(),
      direction_label(options),
      direction_icon(options)
    );
  }
}

fn print_change(cli: &Cli, changed: bool, message: &str, unchanged: &str) -> Result<()> {
  if cli.json {
    return print_json(&serde_json::json!({ "changed": changed }));
  }
  println!("{}", if changed { message } else { unchanged });
  Ok(())
}

fn print_toggle(cli: &Cli, set_num: &str, flag: &str, value: bool) -> Result<()> {
  if cli.json {
    let mut body = serde_json::Map::new();
    body.insert("setNum".to_string(), set_num.into());
    body.insert(flag.to_string(), value.into());
    return print_json(&body);
  }
  println!("{} {}: {}", set_num, flag, if value { "yes" } else { "no" });
  Ok(())
}

fn print_summary(cli: &Cli, summary: &HomeSummary) -> Result<()> {
  if cli.json {
    return print_json(summary);
  }
  println!("Catalog sets:   {}", summary.catalog_sets);
  println!("Total sets:     {}", summary.collection.total);
  println!("  Built:        {}", summary.collection.built);
  println!("  Unbuilt:      {}", summary.collection.unbuilt);
  println!("  Favorites:    {}", summary.collection.favorites);
  println!("  Pieces:       {}", summary.collection.total_parts);
  println!("Wishlist:       {}", summary.wishlist_sets);
  Ok(())
}

fn run(cli: &Cli, state: &AppState) -> Result<()> {
  match &cli.command {
    Commands::Browse(args) => {
      let options = args.sort.options();
      print_sort_header(cli, &options);
      print_records(cli, &commands::browse_catalog(state, &args.query, &options))
    }
    Commands::Show { set_num } => {
      let record = commands::find_set(state, set_num)?;
      let membership = commands::list_membership(state, set_num);
      if cli.json {
        return print_json(&serde_json::json!({ "set": record, "membership": membership }));
      }
      println!("{} ({})", record.name, record.set_num);
      println!("  Year:         {}", record.year);
      println!("  Theme:        {}", record.theme);
      println!("  Pieces:       {}", record.num_parts);
      println!("  Image:        {}", record.img_url);
      if let Some(url) = record.instructions_url.as_deref().filter(|_| record.has_instructions()) {
        println!("  Instructions: {}", url);
      }
      println!("  In collection: {}", if membership.in_collection { "yes" } else { "no" });
      println!("  In wishlist:   {}", if membership.in_wishlist { "yes" } else { "no" });
      Ok(())
    }
    Commands::Collection(command) => run_collection(cli, state, command),
    Commands::Wishlist(command) => run_wishlist(cli, state, command),
    Commands::Stats => print_summary(cli, &commands::home_summary(state)),
  }
}

fn run_collection(cli: &Cli, state: &AppState, command: &CollectionCommand) -> Result<()> {
  let kind = ListKind::Collection;
  match command {
    CollectionCommand::List { query, sort, built } => {
      let request = ListQuery {
        query: query.clone(),
        sort: Some(sort.options()),
        built: (*built).into(),
      };
      print_records(cli, &commands::get_list(state, kind, &request))
    }
    CollectionCommand::Add { set_num } => {
      let added = commands::add_to_list(state, kind, set_num)?;
      print_change(cli, added, "Added to collection.", "Already in collection.")
    }
    CollectionCommand::Remove { set_num } => {
      let removed = commands::remove_from_list(state, kind, set_num)?;
      print_change(cli, removed, "Removed from collection.", "Not in collection.")
    }
    CollectionCommand::ToggleBuilt { set_num } => {
      let built = commands::toggle_built(state, set_num)?;
      print_toggle(cli, set_num, "isBuilt", built)
    }
    CollectionCommand::ToggleFavorite { set_num } => {
      let favorite = commands::toggle_favorite(state, kind, set_num)?;
      print_toggle(cli, set_num, "isFavorite", favorite)
    }
  }
}

fn run_wishlist(cli: &Cli, state: &AppState, command: &WishlistCommand) -> Result<()> {
  let kind = ListKind::Wishlist;
  match command {
    WishlistCommand::List { query } => {
      let request = ListQuery {
        query: query.clone(),
        ..ListQuery::default()
      };
      print_records(cli, &commands::get_list(state, kind, &request))
    }
    WishlistCommand::Add { set_num } => {
      let added = commands::add_to_list(state, kind, set_num)?;
      print_change(cli, added, "Added to wishlist.", "Already in wishlist.")
    }
    WishlistCommand::Remove { set_num } => {
      let removed = commands::remove_from_list(state, kind, set_num)?;
      print_change(cli, removed, "Removed from wishlist.", "Not in wishlist.")
    }
    WishlistCommand::ToggleFavorite { set_num } => {
      let favorite = commands::toggle_favorite(state, kind, set_num)?;
      print_toggle(cli, set_num, "isFavorite", favorite)
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(&cli);

  let overrides = ConfigOverrides {
    data_dir: cli.data_dir.clone(),
    catalog_dir: cli.catalog_dir.clone(),
    catalog_name: cli.catalog.clone(),
    columns: cli.columns.map(usize::from),
    theme: cli.theme.map(Into::into),
  };

  let result = AppConfig::resolve(overrides)
    .and_then(|config| init_state(&config))
    .and_then(|state| run(&cli, &state));

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{}", e);
      eprintln!("error: {}", e);
      ExitCode::FAILURE
    }
  }
}
