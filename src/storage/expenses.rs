//! Expense repository
//!
//! Handles persistence of expense records to `expenses.csv`.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{parse_shared_flag, shared_flag_str, ExpenseRecord, Frequency, SplitMode};

use super::csv_io::{append_csv_row, read_csv, write_csv_atomic, RowView, SkipReason, SkippedRow};
use super::schema::{ensure_rewritable, prepare_for_append, EXPENSES};

/// Parse one row of the expense file
///
/// Only the amount is required. Unknown frequency, split mode or shared flag
/// values fall back to monthly, income and not shared.
pub fn parse_expense(row: &RowView<'_>) -> Result<ExpenseRecord, SkipReason> {
    let amount = row.amount("amount")?;
    let person_or_account = row.text("person_or_account");
    let paid_from_account = match row.get("paid_from_account") {
        Some(account) if !account.is_empty() => account.to_string(),
        _ => person_or_account.clone(),
    };

    Ok(ExpenseRecord {
        category: row.text("category"),
        person_or_account,
        paid_from_account,
        description: row.text("description"),
        is_shared: parse_shared_flag(row.get("is_shared").unwrap_or_default()),
        frequency: Frequency::from_stored(row.get("frequency").unwrap_or_default()),
        split_mode: SplitMode::from_stored(row.get("split_mode").unwrap_or_default()),
        amount,
    })
}

/// Encode an expense record in the current layout
pub fn expense_to_row(expense: &ExpenseRecord) -> Vec<String> {
    vec![
        expense.category.clone(),
        expense.person_or_account.clone(),
        expense.paid_from_account.clone(),
        expense.description.clone(),
        shared_flag_str(expense.is_shared).to_string(),
        expense.frequency.as_str().to_string(),
        expense.split_mode.as_str().to_string(),
        expense.amount.to_field(),
    ]
}

/// Repository for expense records
pub struct ExpenseRepository {
    path: PathBuf,
    expenses: RwLock<Vec<ExpenseRecord>>,
    skipped: RwLock<Vec<SkippedRow>>,
}

impl ExpenseRepository {
    /// Create a new repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            expenses: RwLock::new(Vec::new()),
            skipped: RwLock::new(Vec::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let report = read_csv(&self.path, parse_expense)?;

        let mut expenses = self
            .expenses
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut skipped = self
            .skipped
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *expenses = report.records;
        *skipped = report.skipped;
        Ok(())
    }

    /// Rewrite the whole file from the in-memory snapshot
    ///
    /// A file with an unknown header is a `Schema` error and stays untouched.
    pub fn save(&self) -> Result<(), BudgetError> {
        ensure_rewritable(&self.path, &EXPENSES)?;

        let expenses = self
            .expenses
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_csv_atomic(
            &self.path,
            &EXPENSES.headers(),
            expenses.iter().map(expense_to_row),
        )?;
        tracing::debug!(rows = expenses.len(), "rewrote expense file");
        Ok(())
    }

    /// Append an expense to the file and the snapshot
    pub fn append(&self, expense: ExpenseRecord) -> Result<usize, BudgetError> {
        prepare_for_append(&self.path, &EXPENSES)?;
        append_csv_row(&self.path, &expense_to_row(&expense))?;

        let mut expenses = self
            .expenses
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        expenses.push(expense);
        Ok(expenses.len() - 1)
    }

    /// Get the expense at a position
    pub fn get(&self, index: usize) -> Result<Option<ExpenseRecord>, BudgetError> {
        let expenses = self
            .expenses
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(expenses.get(index).cloned())
    }

    /// Replace the expense at a position (in memory; call `save()` to persist)
    pub fn update(&self, index: usize, expense: ExpenseRecord) -> Result<(), BudgetError> {
        let mut expenses = self
            .expenses
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let slot = expenses
            .get_mut(index)
            .ok_or_else(|| BudgetError::expense_not_found(index))?;
        *slot = expense;
        Ok(())
    }

    /// Remove the expense at a position (in memory; call `save()` to persist)
    pub fn remove(&self, index: usize) -> Result<ExpenseRecord, BudgetError> {
        let mut expenses = self
            .expenses
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if index >= expenses.len() {
            return Err(BudgetError::expense_not_found(index));
        }
        Ok(expenses.remove(index))
    }

    /// Get all expenses in file order
    pub fn get_all(&self) -> Result<Vec<ExpenseRecord>, BudgetError> {
        let expenses = self
            .expenses
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(expenses.clone())
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
    fn test_legacy_rows_get_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        fs::write(
            &path,
            "category,person_or_account,description,is_shared,amount\n\
             Miete,Gemeinschaftskonto,Wohnung,ja,900\n\
             Handy,Andreas,,nein,20\n",
        )
        .unwrap();

        let repo = ExpenseRepository::new(path);
        repo.load().unwrap();
        let all = repo.get_all().unwrap();

        assert_eq!(all.len(), 2);
        assert!(all[0].is_shared);
        assert_eq!(all[0].frequency, Frequency::Monthly);
        assert_eq!(all[0].split_mode, SplitMode::Income);
        assert_eq!(all[0].paid_from_account, "Gemeinschaftskonto");
        assert!(!all[1].is_shared);
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        fs::write(
            &path,
            "category,person_or_account,paid_from_account,description,is_shared,frequency,split_mode,amount\n\
             Auto,Andreas,,Service,vielleicht,fortnightly,thirds,300\n\
             Versicherung,Katharina,Konto Katharina,,ja,Yearly,equal,1200\n\
             Kaputt,Andreas,,,ja,monthly,equal,zwölf\n",
        )
        .unwrap();

        let repo = ExpenseRepository::new(path);
        repo.load().unwrap();
        let all = repo.get_all().unwrap();

        assert_eq!(all.len(), 2);
        assert!(!all[0].is_shared);
        assert_eq!(all[0].frequency, Frequency::Monthly);
        assert_eq!(all[0].split_mode, SplitMode::Income);
        assert_eq!(all[0].paid_from_account, "Andreas");

        assert_eq!(all[1].frequency, Frequency::Yearly);
        assert_eq!(all[1].split_mode, SplitMode::Equal);
        assert_eq!(all[1].monthly_amount().value(), 100.0);

        let skipped = repo.skipped().unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].line, 4);
        assert_eq!(skipped[0].reason, SkipReason::InvalidAmount("zwölf".into()));
    }

    #[test]
    fn test_append_update_save_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        let repo = ExpenseRepository::new(path.clone());

        let mut expense = ExpenseRecord::new("Strom", "Andreas", Money::new(80.0))
            .shared(SplitMode::Equal)
            .with_paid_from("Gemeinschaftskonto");
        expense.description = "Abschlag, monatlich".into();
        repo.append(expense.clone()).unwrap();
        repo.append(
            ExpenseRecord::new("Versicherung", "Katharina", Money::new(600.0))
                .with_frequency(Frequency::Quarterly),
        )
        .unwrap();

        let mut changed = expense.clone();
        changed.amount = Money::new(95.0);
        repo.update(0, changed).unwrap();
        repo.save().unwrap();

        let reloaded = ExpenseRepository::new(path);
        reloaded.load().unwrap();
        let all = reloaded.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].amount.value(), 95.0);
        assert_eq!(all[0].description, "Abschlag, monatlich");
        assert_eq!(all[0].split_mode, SplitMode::Equal);
        assert_eq!(all[1].monthly_amount().value(), 200.0);
    }

    #[test]
    fn test_save_refuses_unknown_columns() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        let contents = "category,person_or_account,paid_from_account,description,is_shared,frequency,split_mode,amount,notiz\n\
                        Miete,A,A,,ja,monthly,income,900,Staffelmiete\n";
        fs::write(&path, contents).unwrap();

        let repo = ExpenseRepository::new(path.clone());
        repo.load().unwrap();
        let mut first = repo.get_all().unwrap()[0].clone();
        first.amount = Money::new(950.0);
        repo.update(0, first).unwrap();

        assert!(matches!(repo.save(), Err(BudgetError::Schema(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }
}
