//! Account repository
//!
//! Handles persistence of the account registry to `accounts.csv`.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::Account;

use super::csv_io::{read_csv, write_csv_atomic, RowView, SkipReason, SkippedRow};
use super::schema::{ensure_rewritable, ACCOUNTS};

fn parse_account(row: &RowView<'_>) -> Result<Account, SkipReason> {
    let name = row.text("name");
    if name.is_empty() {
        return Err(SkipReason::MissingField("name"));
    }
    Ok(Account {
        name,
        owner: row.text("owner"),
    })
}

fn account_to_row(account: &Account) -> Vec<String> {
    vec![account.name.clone(), account.owner.clone()]
}

/// Repository for accounts
pub struct AccountRepository {
    path: PathBuf,
    accounts: RwLock<Vec<Account>>,
    skipped: RwLock<Vec<SkippedRow>>,
}

impl AccountRepository {
    /// Create a new repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            accounts: RwLock::new(Vec::new()),
            skipped: RwLock::new(Vec::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let report = read_csv(&self.path, parse_account)?;

        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut skipped = self
            .skipped
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *accounts = report.records;
        *skipped = report.skipped;
        Ok(())
    }

    /// Save accounts to disk, sorted by name
    pub fn save(&self) -> Result<(), BudgetError> {
        ensure_rewritable(&self.path, &ACCOUNTS)?;

        let accounts = self
            .accounts
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = accounts.iter().collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        write_csv_atomic(
            &self.path,
            &ACCOUNTS.headers(),
            list.into_iter().map(account_to_row),
        )
    }

    /// Get an account by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Account>, BudgetError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(accounts.iter().find(|a| a.matches(name)).cloned())
    }

    /// Check if an account name already exists
    pub fn name_exists(&self, name: &str) -> Result<bool, BudgetError> {
        Ok(self.get_by_name(name)?.is_some())
    }

    /// Add an account (in memory; call `save()` to persist)
    pub fn insert(&self, account: Account) -> Result<(), BudgetError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        accounts.push(account);
        Ok(())
    }

    /// Remove an account by name (in memory; call `save()` to persist)
    pub fn remove(&self, name: &str) -> Result<Option<Account>, BudgetError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(accounts
            .iter()
            .position(|a| a.matches(name))
            .map(|index| accounts.remove(index)))
    }

    /// Get all accounts in file order
    pub fn get_all(&self) -> Result<Vec<Account>, BudgetError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(accounts.clone())
    }

    /// Rows dropped by the last `load()`
    pub fn skipped(&self) -> Result<Vec<SkippedRow>, BudgetError> {
        let skipped = self
            .skipped
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(skipped.clone())
    }
}
