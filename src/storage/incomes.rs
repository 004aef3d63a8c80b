//! Income repository
//!
//! Handles persistence of income records to `incomes.csv`.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::IncomeRecord;

use super::csv_io::{append_csv_row, read_csv, write_csv_atomic, RowView, SkipReason, SkippedRow};
use super::schema::{ensure_rewritable, prepare_for_append, INCOMES};

/// Parse one row of the income file
pub fn parse_income(row: &RowView<'_>) -> Result<IncomeRecord, SkipReason> {
    let amount = row.amount("amount")?;
    Ok(IncomeRecord {
        person: row.text("person"),
        source: row.text("source"),
        amount,
        account: row.text("account"),
    })
}

/// Encode an income record in the current layout
pub fn income_to_row(income: &IncomeRecord) -> Vec<String> {
    vec![
        income.person.clone(),
        income.source.clone(),
        income.amount.to_field(),
        income.account.clone(),
    ]
}

/// Repository for income records
///
/// Holds the snapshot loaded by the last `load()`; records are addressed by
/// their position in it.
pub struct IncomeRepository {
    path: PathBuf,
    incomes: RwLock<Vec<IncomeRecord>>,
    skipped: RwLock<Vec<SkippedRow>>,
}

impl IncomeRepository {
    /// Create a new repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            incomes: RwLock::new(Vec::new()),
            skipped: RwLock::new(Vec::new()),
        }
    }

    /// Load incomes from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let report = read_csv(&self.path, parse_income)?;

        let mut incomes = self
            .incomes
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut skipped = self
            .skipped
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *incomes = report.records;
        *skipped = report.skipped;
        Ok(())
    }

    /// Rewrite the whole file from the in-memory snapshot
    ///
    /// Rows skipped during `load()` are not written back.
    pub fn save(&self) -> Result<(), BudgetError> {
        ensure_rewritable(&self.path, &INCOMES)?;

        let incomes = self
            .incomes
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_csv_atomic(&self.path, &INCOMES.headers(), incomes.iter().map(income_to_row))?;
        tracing::debug!(rows = incomes.len(), "rewrote income file");
        Ok(())
    }

    /// Append an income to the file and the snapshot
    pub fn append(&self, income: IncomeRecord) -> Result<usize, BudgetError> {
        prepare_for_append(&self.path, &INCOMES)?;
        append_csv_row(&self.path, &income_to_row(&income))?;

        let mut incomes = self
            .incomes
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        incomes.push(income);
        Ok(incomes.len() - 1)
    }

    /// Get the income at a position
    pub fn get(&self, index: usize) -> Result<Option<IncomeRecord>, BudgetError> {
        let incomes = self
            .incomes
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(incomes.get(index).cloned())
    }

    /// Replace the income at a position (in memory; call `save()` to persist)
    pub fn update(&self, index: usize, income: IncomeRecord) -> Result<(), BudgetError> {
        let mut incomes = self
            .incomes
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let slot = incomes
            .get_mut(index)
            .ok_or_else(|| BudgetError::income_not_found(index))?;
        *slot = income;
        Ok(())
    }

    /// Remove the income at a position (in memory; call `save()` to persist)
    pub fn remove(&self, index: usize) -> Result<IncomeRecord, BudgetError> {
        let mut incomes = self
            .incomes
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if index >= incomes.len() {
            return Err(BudgetError::income_not_found(index));
        }
        Ok(incomes.remove(index))
    }

    /// Get all incomes in file order
    pub fn get_all(&self) -> Result<Vec<IncomeRecord>, BudgetError> {
        let incomes = self
            .incomes
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(incomes.clone())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_append_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("incomes.csv");

        {
            let repo = IncomeRepository::new(path.clone());
            let index = repo
                .append(IncomeRecord::new("Andreas", "Gehalt", Money::new(3000.0)))
                .unwrap();
            assert_eq!(index, 0);
            repo.append(
                IncomeRecord::new("Kindergeld", "Familienkasse", Money::new(250.0))
                    .with_account("Gemeinschaftskonto"),
            )
            .unwrap();
        }

        let repo = IncomeRepository::new(path);
        repo.load().unwrap();
        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].account, "Gemeinschaftskonto");
        assert_eq!(all[1].amount.value(), 250.0);
    }

    #[test]
    fn test_legacy_file_is_readable_and_migrated_on_append() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("incomes.csv");
        fs::write(&path, "person,source,amount\nAndreas,Gehalt,\"3000,50\"\nKatharina,Gehalt,\n").unwrap();

        let repo = IncomeRepository::new(path.clone());
        repo.load().unwrap();
        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount.value(), 3000.5);
        assert_eq!(all[0].account, "");
        assert_eq!(repo.skipped().unwrap().len(), 1);

        repo.append(IncomeRecord::new("Katharina", "Gehalt", Money::new(2000.0)))
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("person,source,amount,account\n"));

        let reloaded = IncomeRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_all().unwrap().len(), 2);
        // The broken row survives migration and is still skipped
        assert_eq!(reloaded.skipped().unwrap().len(), 1);
    }

    #[test]
    fn test_update_remove_and_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("incomes.csv");
        let repo = IncomeRepository::new(path.clone());
        repo.append(IncomeRecord::new("Andreas", "Gehalt", Money::new(3000.0)))
            .unwrap();
        repo.append(IncomeRecord::new("Katharina", "Gehalt", Money::new(2000.0)))
            .unwrap();

        repo.update(0, IncomeRecord::new("Andreas", "Gehalt", Money::new(3100.0)))
            .unwrap();
        let removed = repo.remove(1).unwrap();
        assert_eq!(removed.person, "Katharina");
        repo.save().unwrap();

        let reloaded = IncomeRepository::new(path);
        reloaded.load().unwrap();
        let all = reloaded.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount.value(), 3100.0);
    }

    #[test]
    fn test_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let repo = IncomeRepository::new(temp_dir.path().join("incomes.csv"));

        assert!(repo.get(0).unwrap().is_none());
        assert!(repo
            .update(0, IncomeRecord::new("A", "", Money::zero()))
            .unwrap_err()
            .is_not_found());
        assert!(repo.remove(3).unwrap_err().is_not_found());
    }
}
