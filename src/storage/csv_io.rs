//! CSV file I/O with atomic rewrites
//!
//! Rows are read by header name, so files written by older versions of the
//! tool stay readable. Rows that cannot be turned into a record are not
//! errors: they are collected in [`LoadReport::skipped`] together with the
//! reason.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, StringRecord, Writer, WriterBuilder};

use crate::error::BudgetError;
use crate::models::{Money, MoneyParseError};

/// Why a row was left out of a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A required column is absent or empty
    MissingField(&'static str),
    /// The amount column holds something that is not a number
    InvalidAmount(String),
    /// The CSV reader could not decode the row
    Unreadable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing {}", field),
            Self::InvalidAmount(raw) => write!(f, "amount '{}' is not a number", raw),
            Self::Unreadable(err) => write!(f, "unreadable row: {}", err),
        }
    }
}

/// A row that was dropped while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the file (the header is line 1)
    pub line: u64,
    pub reason: SkipReason,
}

/// Records parsed from a file plus the rows that were dropped
#[derive(Debug, Clone)]
pub struct LoadReport<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// A data row with name-based column access
pub struct RowView<'a> {
    headers: &'a [String],
    record: &'a StringRecord,
}

impl<'a> RowView<'a> {
    pub fn new(headers: &'a [String], record: &'a StringRecord) -> Self {
        Self { headers, record }
    }

    /// Trimmed value of a column; `None` if the column does not exist in this file
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|h| h == column)?;
        self.record.get(index).map(str::trim)
    }

    /// Trimmed value of a column, empty if the column is absent
    pub fn text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    /// Parse a required amount column
    pub fn amount(&self, column: &'static str) -> Result<Money, SkipReason> {
        let raw = self.get(column).unwrap_or_default();
        Money::parse(raw).map_err(|e| match e {
            MoneyParseError::Empty => SkipReason::MissingField(column),
            MoneyParseError::InvalidFormat(_) | MoneyParseError::NotFinite(_) => {
                SkipReason::InvalidAmount(raw.to_string())
            }
        })
    }
}

/// Raw content of a CSV file
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Header names, trimmed; empty for a missing or empty file
    pub headers: Vec<String>,
    /// Data rows with their line numbers, or the decode error for that row
    pub rows: Vec<(u64, Result<StringRecord, String>)>,
}

/// Read a CSV file without interpreting it
///
/// A missing file reads as an empty table.
pub fn read_raw<P: AsRef<Path>>(path: P) -> Result<RawTable, BudgetError> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(RawTable::default());
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| BudgetError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let headers = match reader.headers() {
        Ok(headers) => headers
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect(),
        Err(e) => {
            return Err(BudgetError::Storage(format!(
                "Failed to read header of {}: {}",
                path.display(),
                e
            )))
        }
    };

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 2);
                rows.push((line, Ok(record)));
            }
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 2);
                rows.push((line, Err(e.to_string())));
            }
        }
    }

    Ok(RawTable { headers, rows })
}

/// Read a CSV file and parse every row with `parse`
///
/// Blank rows are ignored; rows rejected by `parse` or by the CSV reader end
/// up in `skipped`.
pub fn read_csv<T, P, F>(path: P, mut parse: F) -> Result<LoadReport<T>, BudgetError>
where
    P: AsRef<Path>,
    F: FnMut(&RowView<'_>) -> Result<T, SkipReason>,
{
    let table = read_raw(path)?;
    let mut report = LoadReport::default();

    for (line, row) in &table.rows {
        match row {
            Ok(record) if record.iter().all(|field| field.trim().is_empty()) => {}
            Ok(record) => match parse(&RowView::new(&table.headers, record)) {
                Ok(parsed) => report.records.push(parsed),
                Err(reason) => report.skipped.push(SkippedRow {
                    line: *line,
                    reason,
                }),
            },
            Err(e) => report.skipped.push(SkippedRow {
                line: *line,
                reason: SkipReason::Unreadable(e.clone()),
            }),
        }
    }

    Ok(report)
}

/// Read the data rows of a CSV file as raw bytes
///
/// Unlike [`read_raw`], rows that are not valid UTF-8 come back intact.
pub fn read_byte_rows<P: AsRef<Path>>(path: P) -> Result<Vec<ByteRecord>, BudgetError> {
    let path = path.as_ref();

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| BudgetError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    reader
        .byte_records()
        .map(|result| {
            result.map_err(|e| {
                BudgetError::Storage(format!("Failed to read {}: {}", path.display(), e))
            })
        })
        .collect()
}

/// Write a CSV file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_csv_atomic<P, I>(path: P, headers: &[&str], rows: I) -> Result<(), BudgetError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Vec<String>>,
{
    write_atomic_with(path.as_ref(), |writer| {
        writer
            .write_record(headers)
            .map_err(|e| BudgetError::Storage(format!("Failed to write header: {}", e)))?;
        for row in rows {
            writer
                .write_record(&row)
                .map_err(|e| BudgetError::Storage(format!("Failed to write row: {}", e)))?;
        }
        Ok(())
    })
}

/// Run `write` against a temp file next to `path`, then rename it over `path`
///
/// On any failure the temp file is removed and `path` keeps its old content.
pub(crate) fn write_atomic_with<F>(path: &Path, write: F) -> Result<(), BudgetError>
where
    F: FnOnce(&mut Writer<BufWriter<File>>) -> Result<(), BudgetError>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BudgetError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("csv.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| BudgetError::Storage(format!("Failed to create temp file: {}", e)))?;

    let result = write_and_sync(file, write)
        .and_then(|()| {
            fs::rename(&temp_path, path)
                .map_err(|e| BudgetError::Storage(format!("Failed to rename temp file: {}", e)))
        });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_sync<F>(file: File, write: F) -> Result<(), BudgetError>
where
    F: FnOnce(&mut Writer<BufWriter<File>>) -> Result<(), BudgetError>,
{
    let mut writer = WriterBuilder::new().from_writer(BufWriter::new(file));
    write(&mut writer)?;

    let buffered = writer
        .into_inner()
        .map_err(|e| BudgetError::Storage(format!("Failed to flush data: {}", e.error())))?;
    let file = buffered
        .into_inner()
        .map_err(|e| BudgetError::Storage(format!("Failed to flush data: {}", e.error())))?;

    file.sync_all()
        .map_err(|e| BudgetError::Storage(format!("Failed to sync data: {}", e)))
}

/// Append one row to an existing CSV file
///
/// The caller is responsible for the file already carrying `row`'s layout.
pub fn append_csv_row<P: AsRef<Path>>(path: P, row: &[String]) -> Result<(), BudgetError> {
    let path = path.as_ref();

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| BudgetError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(row)
        .map_err(|e| BudgetError::Storage(format!("Failed to encode row: {}", e)))?;
    let encoded = writer
        .into_inner()
        .map_err(|e| BudgetError::Storage(format!("Failed to encode row: {}", e.error())))?;

    file.write_all(&encoded)
        .map_err(|e| BudgetError::Storage(format!("Failed to append row: {}", e)))?;
    file.flush()
        .map_err(|e| BudgetError::Storage(format!("Failed to flush {}: {}", path.display(), e)))?;

    Ok(())
}
