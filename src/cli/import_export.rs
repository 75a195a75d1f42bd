use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::index::ListingTree;
use crate::types::{FieldValue, Listing, ListingError};

/// Names of the CSV columns holding the fields the index interprets.
///
/// Matching is case-insensitive. Columns not named here are carried as
/// [`Listing::extra`] fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Column holding the city name.
    pub city: String,
    /// Column holding the asking price.
    pub price: String,
    /// Column holding the total surface.
    pub surface_total: String,
    /// Column holding the bedroom count.
    pub bedrooms: String,
    /// Column holding the bathroom count.
    pub bathrooms: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            city: "city".into(),
            price: "price".into(),
            surface_total: "surface_total".into(),
            bedrooms: "bedrooms".into(),
            bathrooms: "bathrooms".into(),
        }
    }
}

/// Configuration for loading listings from a CSV file.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Path to the CSV file.
    pub path: PathBuf,
    /// Column names for the interpreted fields.
    pub columns: ColumnMapping,
    /// Skip rows that cannot be parsed or keyed instead of aborting.
    pub skip_invalid: bool,
}

impl ImportConfig {
    /// Default column mapping, aborting on the first bad row.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            columns: ColumnMapping::default(),
            skip_invalid: false,
        }
    }
}

/// Summary statistics from an import operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Data rows read from the file.
    pub rows_read: u64,
    /// Rows inserted into the tree.
    pub inserted: u64,
    /// Rows dropped because they could not be parsed or keyed.
    pub skipped: u64,
    /// Inserted rows whose primary metric collided with an existing key.
    pub key_collisions: u64,
}

/// Summary statistics from an export operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Rows written, one per tree node.
    pub rows_written: u64,
}

/// Error type for CLI import/export operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Generic error message.
    #[error("{0}")]
    Message(String),
    /// A data row could not be turned into an indexed listing.
    #[error("row {line}: {message}")]
    Row {
        /// 1-based line number in the source file, header included.
        line: u64,
        /// What was wrong with it.
        message: String,
    },
    /// IO error from file operations.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// CSV parsing or writing error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Index error.
    #[error(transparent)]
    Listing(#[from] ListingError),
}

impl From<&str> for CliError {
    fn from(value: &str) -> Self {
        CliError::Message(value.to_string())
    }
}

impl From<String> for CliError {
    fn from(value: String) -> Self {
        CliError::Message(value)
    }
}

/// Loads every row of `cfg.path` into `tree`.
pub fn run_import(tree: &mut ListingTree, cfg: &ImportConfig) -> Result<ImportSummary, CliError> {
    if !cfg.path.exists() {
        return Err(CliError::Message(format!(
            "dataset {} does not exist",
            cfg.path.display()
        )));
    }
    let file = std::fs::File::open(&cfg.path)?;
    let summary = import_from_reader(tree, file, &cfg.columns, cfg.skip_invalid)?;
    info!(
        path = %cfg.path.display(),
        inserted = summary.inserted,
        skipped = summary.skipped,
        "import.finished"
    );
    Ok(summary)
}

/// Loads CSV rows from any reader into `tree`.
pub fn import_from_reader<R: io::Read>(
    tree: &mut ListingTree,
    reader: R,
    columns: &ColumnMapping,
    skip_invalid: bool,
) -> Result<ImportSummary, CliError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::resolve(&headers, columns)?;

    let mut summary = ImportSummary::default();
    for (offset, result) in reader.records().enumerate() {
        let line = offset as u64 + 2;
        let record = result?;
        summary.rows_read += 1;
        let collisions_before = tree.stats().key_collisions;
        let outcome = layout
            .parse(&record)
            .and_then(|listing| tree.insert(listing).map_err(|err| err.to_string()));
        match outcome {
            Ok(key) => {
                summary.inserted += 1;
                summary.key_collisions += tree.stats().key_collisions - collisions_before;
                debug!(line, key, "import.row_inserted");
            }
            Err(message) if skip_invalid => {
                warn!(line, %message, "import.row_skipped");
                summary.skipped += 1;
            }
            Err(message) => return Err(CliError::Row { line, message }),
        }
    }
    Ok(summary)
}

/// Writes the tree in key order to `path`.
pub fn run_export(tree: &ListingTree, path: &Path) -> Result<ExportSummary, CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let summary = export_to_writer(tree, file)?;
    info!(path = %path.display(), rows = summary.rows_written, "export.finished");
    Ok(summary)
}

/// Writes the tree in key order as CSV, one row per node.
///
/// The first column is the node's key; extra fields from every record are
/// unioned into trailing columns.
pub fn export_to_writer<W: io::Write>(
    tree: &ListingTree,
    writer: W,
) -> Result<ExportSummary, CliError> {
    // Extras named like a fixed column (a `metric` picked up when
    // re-importing an export) are superseded by the fixed column.
    let extras: BTreeSet<&str> = tree
        .iter()
        .flat_map(|(_, listing)| listing.extra.keys().map(String::as_str))
        .filter(|name| {
            !EXPORT_COLUMNS
                .iter()
                .any(|fixed| fixed.eq_ignore_ascii_case(name))
        })
        .collect();

    let mut writer = WriterBuilder::new().from_writer(writer);
    let mut header = EXPORT_COLUMNS.to_vec();
    header.extend(extras.iter().copied());
    writer.write_record(&header)?;

    let mut summary = ExportSummary::default();
    for (key, listing) in tree {
        let mut row = Vec::with_capacity(header.len());
        row.push(key.to_string());
        row.push(listing.city.clone());
        row.push(listing.price.to_string());
        row.push(listing.surface_total.to_string());
        row.push(listing.bedrooms.to_string());
        row.push(listing.bathrooms.to_string());
        for name in &extras {
            row.push(
                listing
                    .extra
                    .get(*name)
                    .map(|value| value.to_string())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&row)?;
        summary.rows_written += 1;
    }
    writer.flush()?;
    Ok(summary)
}

const EXPORT_COLUMNS: [&str; 6] = [
    "metric",
    "city",
    "price",
    "surface_total",
    "bedrooms",
    "bathrooms",
];

struct ColumnSpec {
    name: String,
    index: usize,
}

struct ColumnLayout {
    city: usize,
    price: usize,
    surface_total: usize,
    bedrooms: usize,
    bathrooms: usize,
    extra: Vec<ColumnSpec>,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord, columns: &ColumnMapping) -> Result<Self, CliError> {
        let city = find_column(headers, &columns.city)?;
        let price = find_column(headers, &columns.price)?;
        let surface_total = find_column(headers, &columns.surface_total)?;
        let bedrooms = find_column(headers, &columns.bedrooms)?;
        let bathrooms = find_column(headers, &columns.bathrooms)?;
        let named = [city, price, surface_total, bedrooms, bathrooms];
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(index, name)| !named.contains(index) && !name.is_empty())
            .map(|(index, name)| ColumnSpec {
                name: name.to_string(),
                index,
            })
            .collect();
        Ok(Self {
            city,
            price,
            surface_total,
            bedrooms,
            bathrooms,
            extra,
        })
    }

    fn parse(&self, record: &StringRecord) -> Result<Listing, String> {
        let mut listing = Listing::new(
            get_required(record, self.city, "city")?,
            parse_amount(get_required(record, self.price, "price")?, "price")?,
            parse_amount(
                get_required(record, self.surface_total, "surface_total")?,
                "surface_total",
            )?,
            parse_count(get_required(record, self.bedrooms, "bedrooms")?, "bedrooms")?,
            parse_count(
                get_required(record, self.bathrooms, "bathrooms")?,
                "bathrooms",
            )?,
        );
        for column in &self.extra {
            if let Some(raw) = record.get(column.index).filter(|raw| !raw.is_empty()) {
                listing
                    .extra
                    .insert(column.name.clone(), FieldValue::infer(raw));
            }
        }
        Ok(listing)
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize, CliError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| CliError::Message(format!("column '{}' not found", name)))
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| format!("missing value for column '{name}'"))
}

fn parse_amount(raw: &str, name: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|_| format!("column '{name}' is not a number: '{raw}'"))
}

/// Accepts integral floats such as `3.0`, which spreadsheet exports produce.
fn parse_count(raw: &str, name: &str) -> Result<u32, String> {
    if let Ok(value) = raw.parse::<u32>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) => {
            Ok(value as u32)
        }
        _ => Err(format!(
            "column '{name}' is not a non-negative integer: '{raw}'"
        )),
    }
}
