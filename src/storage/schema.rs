//! Versioned layouts of the CSV files
//!
//! Every table knows its current columns (with the value a missing column
//! takes) and the header layouts earlier versions wrote. Migration rewrites a
//! legacy file in the current layout without dropping any row; parsing the
//! rows into records is left to the repositories.

use std::path::Path;

use csv::ByteRecord;

use super::csv_io::{read_byte_rows, read_raw, write_atomic_with, write_csv_atomic};
use crate::error::BudgetError;

/// A column of the current layout
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    /// Value written when migrating a file that lacks this column
    pub default: &'static str,
}

/// Current and historical layout of one CSV file
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub table: &'static str,
    pub columns: &'static [Column],
    /// Header layouts of earlier versions, oldest first
    pub legacy_layouts: &'static [&'static [&'static str]],
}

/// How a file's header relates to a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// No file, or a file without a header
    Missing,
    Current,
    /// A layout written by an earlier version (1 = oldest)
    Legacy { version: u32 },
    Unrecognized,
}

/// Result of a migration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    UpToDate,
    NotPresent,
    Migrated { from_version: u32, rows: usize },
}

pub const INCOMES: TableSchema = TableSchema {
    table: "incomes",
    columns: &[
        Column { name: "person", default: "" },
        Column { name: "source", default: "" },
        Column { name: "amount", default: "" },
        Column { name: "account", default: "" },
    ],
    legacy_layouts: &[&["person", "source", "amount"]],
};

pub const EXPENSES: TableSchema = TableSchema {
    table: "expenses",
    columns: &[
        Column { name: "category", default: "" },
        Column { name: "person_or_account", default: "" },
        Column { name: "paid_from_account", default: "" },
        Column { name: "description", default: "" },
        Column { name: "is_shared", default: "nein" },
        Column { name: "frequency", default: "monthly" },
        Column { name: "split_mode", default: "income" },
        Column { name: "amount", default: "" },
    ],
    legacy_layouts: &[
        &["category", "person_or_account", "description", "is_shared", "amount"],
        &["category", "person_or_account", "description", "is_shared", "frequency", "amount"],
    ],
};

pub const ACCOUNTS: TableSchema = TableSchema {
    table: "accounts",
    columns: &[
        Column { name: "name", default: "" },
        Column { name: "owner", default: "" },
    ],
    legacy_layouts: &[],
};

impl TableSchema {
    /// Column names of the current layout
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Version number of the current layout
    pub fn current_version(&self) -> u32 {
        self.legacy_layouts.len() as u32 + 1
    }

    /// Classify a header row
    pub fn layout(&self, headers: &[String]) -> Layout {
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Layout::Missing;
        }
        if same_columns(headers, &self.headers()) {
            return Layout::Current;
        }
        self.legacy_layouts
            .iter()
            .position(|legacy| same_columns(headers, legacy))
            .map(|index| Layout::Legacy {
                version: index as u32 + 1,
            })
            .unwrap_or(Layout::Unrecognized)
    }

    /// Reorder a raw row from `headers` into the current layout
    ///
    /// Field bytes are copied as they are, so rows that are not valid UTF-8
    /// survive unchanged.
    pub fn convert_row(&self, headers: &[String], record: &ByteRecord) -> ByteRecord {
        self.columns
            .iter()
            .map(|column| {
                headers
                    .iter()
                    .position(|h| h == column.name)
                    .and_then(|index| record.get(index))
                    .unwrap_or(column.default.as_bytes())
            })
            .collect()
    }
}

fn same_columns(headers: &[String], expected: &[&str]) -> bool {
    headers.len() == expected.len() && headers.iter().zip(expected).all(|(h, e)| h == e)
}

fn unrecognized(path: &Path, headers: &[String]) -> BudgetError {
    BudgetError::Schema(format!(
        "{} has an unrecognized header: {}",
        path.display(),
        headers.join(",")
    ))
}

/// Rewrite a legacy file in the current layout
///
/// Every data row is carried over, including rows the record parser will
/// later skip and rows that are not valid UTF-8.
pub fn migrate_table<P: AsRef<Path>>(
    path: P,
    schema: &TableSchema,
) -> Result<MigrationOutcome, BudgetError> {
    let path = path.as_ref();
    let table = read_raw(path)?;

    match schema.layout(&table.headers) {
        Layout::Missing => Ok(MigrationOutcome::NotPresent),
        Layout::Current => Ok(MigrationOutcome::UpToDate),
        Layout::Unrecognized => Err(unrecognized(path, &table.headers)),
        Layout::Legacy { version } => {
            let rows: Vec<ByteRecord> = read_byte_rows(path)?
                .iter()
                .map(|record| schema.convert_row(&table.headers, record))
                .collect();
            let count = rows.len();

            write_atomic_with(path, |writer| {
                writer
                    .write_record(schema.headers())
                    .map_err(|e| BudgetError::Storage(format!("Failed to write header: {}", e)))?;
                for row in &rows {
                    writer
                        .write_byte_record(row)
                        .map_err(|e| BudgetError::Storage(format!("Failed to write row: {}", e)))?;
                }
                Ok(())
            })?;

            tracing::info!(
                table = schema.table,
                from_version = version,
                to_version = schema.current_version(),
                rows = count,
                "migrated data file"
            );

            Ok(MigrationOutcome::Migrated {
                from_version: version,
                rows: count,
            })
        }
    }
}

/// Refuse a full rewrite of a file whose header this version does not know
///
/// Rewriting would drop the unknown columns.
pub fn ensure_rewritable<P: AsRef<Path>>(path: P, schema: &TableSchema) -> Result<(), BudgetError> {
    let path = path.as_ref();
    let table = read_raw(path)?;

    match schema.layout(&table.headers) {
        Layout::Unrecognized => Err(unrecognized(path, &table.headers)),
        _ => Ok(()),
    }
}

/// Create the file with the current header if it does not exist or is empty
pub fn ensure_table<P: AsRef<Path>>(path: P, schema: &TableSchema) -> Result<bool, BudgetError> {
    let path = path.as_ref();
    let table = read_raw(path)?;

    if schema.layout(&table.headers) != Layout::Missing {
        return Ok(false);
    }

    write_csv_atomic(path, &schema.headers(), Vec::new())?;
    tracing::debug!(table = schema.table, path = %path.display(), "created data file");
    Ok(true)
}

/// Make sure a file can take appended rows in the current layout
pub fn prepare_for_append<P: AsRef<Path>>(path: P, schema: &TableSchema) -> Result<(), BudgetError> {
    let path = path.as_ref();
    ensure_table(path, schema)?;
    migrate_table(path, schema)?;
    Ok(())
}
