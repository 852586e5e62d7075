use log::{error, info, warn};

use crate::model::{CatalogRecord, CatalogSchema, Classification, ColumnLayout, ThemeColumn};
use crate::resource::ResourceLoader;

/// Split one CSV row into fields. A double quote toggles quoted mode and is
/// dropped from the output; commas inside quotes are kept as text.
pub fn split_row(line: &str) -> Vec<String> {
  let mut fields = Vec::new();
  let mut current = String::new();
  let mut inside_quotes = false;

  for ch in line.chars() {
    match ch {
      '"' => inside_quotes = !inside_quotes,
      ',' if !inside_quotes => fields.push(std::mem::take(&mut current)),
      _ => current.push(ch),
    }
  }
  fields.push(current);

  fields
}

/// Lenient integer parse: anything that is not a plain integer becomes 0.
pub fn parse_int(value: &str) -> i64 {
  value.trim().parse::<i64>().unwrap_or(0)
}

/// Build a record from a split row. None when the row does not have exactly
/// `schema.expected_fields()` fields.
pub fn parse_record(fields: &[String], schema: &CatalogSchema) -> Option<CatalogRecord> {
  if fields.len() != schema.expected_fields() {
    return None;
  }
  let text = |index: usize| fields[index].trim().to_string();

  let theme = match schema.theme {
    ThemeColumn::Id => Classification::ById(parse_int(&fields[3])),
    ThemeColumn::Name => Classification::ByName(text(3)),
  };
  let instructions_url = match schema.columns {
    ColumnLayout::Legacy => None,
    ColumnLayout::Current => Some(text(6)).filter(|url| !url.is_empty()),
  };

  Some(CatalogRecord {
    set_num: text(0),
    name: text(1),
    year: parse_int(&fields[2]),
    theme,
    num_parts: parse_int(&fields[4]),
    img_url: text(5),
    instructions_url,
    is_favorite: false,
    is_built: false,
  })
}

/// Lazily parsed catalog rows. The text is split into lines up front; each row
/// is converted when the iterator reaches it.
pub struct CatalogRows<'a> {
  lines: std::iter::Enumerate<std::vec::IntoIter<&'a str>>,
  schema: CatalogSchema,
  skipped: usize,
}

impl<'a> CatalogRows<'a> {
  /// Rows rejected so far for having the wrong number of fields.
  pub fn skipped(&self) -> usize {
    self.skipped
  }
}

impl<'a> Iterator for CatalogRows<'a> {
  type Item = CatalogRecord;

  fn next(&mut self) -> Option<CatalogRecord> {
    let expected = self.schema.expected_fields();
    for (index, line) in self.lines.by_ref() {
      let fields = split_row(line);
      if let Some(record) = parse_record(&fields, &self.schema) {
        return Some(record);
      }
      // +2: one for the header, one for 1-based line numbers.
      warn!(
        "Skipping catalog line {} ({} of {} columns): {}",
        index + 2,
        fields.len(),
        expected,
        line
      );
      self.skipped += 1;
    }
    None
  }
}

/// Parse catalog text whose first line is a header.
pub fn parse_catalog(text: &str, schema: CatalogSchema) -> CatalogRows<'_> {
  let mut lines: Vec<&str> = text.lines().collect();
  if !lines.is_empty() {
    lines.remove(0);
  }

  CatalogRows {
    lines: lines.into_iter().enumerate(),
    schema,
    skipped: 0,
  }
}

/// Parse catalog text, taking the column layout from its header row.
pub fn detect_and_parse(text: &str) -> CatalogRows<'_> {
  let schema = text
    .lines()
    .next()
    .map(CatalogSchema::from_header)
    .unwrap_or_default();
  parse_catalog(text, schema)
}

/// Load and parse a bundled catalog. A missing or unreadable resource yields an
/// empty catalog. `schema: None` detects the layout from the header.
pub fn load_catalog(
  loader: &dyn ResourceLoader,
  name: &str,
  schema: Option<CatalogSchema>,
) -> Vec<CatalogRecord> {
  let text = match loader.read_text(name) {
    Ok(text) => text,
    Err(e) => {
      error!("Could not load catalog '{}': {}", name, e);
      return Vec::new();
    }
  };

  let mut rows = match schema {
    Some(schema) => parse_catalog(&text, schema),
    None => detect_and_parse(&text),
  };
  let records: Vec<CatalogRecord> = rows.by_ref().collect();
  info!(
    "Loaded {} sets from catalog '{}' ({} rows skipped)",
    records.len(),
    name,
    rows.skipped()
  );
  records
}
