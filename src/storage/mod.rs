//! Storage layer for the household budget
//!
//! Flat CSV files with name-based column access, versioned layouts,
//! append-only inserts and atomic full rewrites.

pub mod accounts;
pub mod csv_io;
pub mod expenses;
pub mod incomes;
pub mod init;
pub mod schema;

pub use accounts::AccountRepository;
pub use csv_io::{LoadReport, SkipReason, SkippedRow};
pub use expenses::ExpenseRepository;
pub use incomes::IncomeRepository;
pub use init::{initialize_storage, InitSummary};
pub use schema::MigrationOutcome;

use crate::config::paths::BudgetPaths;
use crate::error::BudgetError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BudgetPaths,
    pub incomes: IncomeRepository,
    pub expenses: ExpenseRepository,
    pub accounts: AccountRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BudgetPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        Ok(Self {
            incomes: IncomeRepository::new(paths.incomes_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            accounts: AccountRepository::new(paths.accounts_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BudgetError> {
        self.incomes.load()?;
        self.expenses.load()?;
        self.accounts.load()?;
        Ok(())
    }

    /// Bring every data file to the current layout and reload
    pub fn migrate(&self) -> Result<Vec<(&'static str, MigrationOutcome)>, BudgetError> {
        let outcomes = vec![
            (
                schema::INCOMES.table,
                schema::migrate_table(self.paths.incomes_file(), &schema::INCOMES)?,
            ),
            (
                schema::EXPENSES.table,
                schema::migrate_table(self.paths.expenses_file(), &schema::EXPENSES)?,
            ),
            (
                schema::ACCOUNTS.table,
                schema::migrate_table(self.paths.accounts_file(), &schema::ACCOUNTS)?,
            ),
        ];

        self.load_all()?;
        Ok(outcomes)
    }

    /// Every row dropped by the last load, per table
    pub fn skipped_rows(&self) -> Result<Vec<(&'static str, SkippedRow)>, BudgetError> {
        let mut rows = Vec::new();
        rows.extend(
            self.incomes
                .skipped()?
                .into_iter()
                .map(|row| (schema::INCOMES.table, row)),
        );
        rows.extend(
            self.expenses
                .skipped()?
                .into_iter()
                .map(|row| (schema::EXPENSES.table, row)),
        );
        rows.extend(
            self.accounts
                .skipped()?
                .into_iter()
                .map(|row| (schema::ACCOUNTS.table, row)),
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(storage.skipped_rows().unwrap().is_empty());
    }

    #[test]
    fn test_load_all_on_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        storage.load_all().unwrap();
        assert!(storage.incomes.get_all().unwrap().is_empty());
        assert!(storage.expenses.get_all().unwrap().is_empty());
        assert!(storage.skipped_rows().unwrap().is_empty());
    }

    #[test]
    fn test_migrate_and_skipped_rows() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        fs::write(
            paths.expenses_file(),
            "category,person_or_account,description,is_shared,amount\nMiete,A,,ja,900\nKaputt,A,,ja,x\n",
        )
        .unwrap();

        let outcomes = storage.migrate().unwrap();
        assert_eq!(
            outcomes[1],
            (
                "expenses",
                MigrationOutcome::Migrated {
                    from_version: 1,
                    rows: 2
                }
            )
        );
        assert_eq!(outcomes[0].1, MigrationOutcome::NotPresent);

        assert_eq!(storage.expenses.get_all().unwrap().len(), 1);
        let skipped = storage.skipped_rows().unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "expenses");
        assert_eq!(skipped[0].1.line, 3);
    }
}
