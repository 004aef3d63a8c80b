//! Income service
//!
//! Provides business logic for managing income records: validation on the
//! way in, positional edits and removal.

use crate::error::{BudgetError, BudgetResult};
use crate::models::{IncomeRecord, Money};
use crate::storage::Storage;

/// Service for income management
pub struct IncomeService<'a> {
    storage: &'a Storage,
}

/// Fields to change on an existing income; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct IncomeUpdate {
    pub person: Option<String>,
    pub source: Option<String>,
    pub amount: Option<Money>,
    pub account: Option<String>,
}

impl IncomeUpdate {
    /// Check if any field would change
    pub fn is_empty(&self) -> bool {
        self.person.is_none()
            && self.source.is_none()
            && self.amount.is_none()
            && self.account.is_none()
    }
}

impl<'a> IncomeService<'a> {
    /// Create a new income service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new income and append it to the file
    ///
    /// Returns the zero-based position of the new record.
    pub fn add(
        &self,
        person: &str,
        source: &str,
        amount: Money,
        account: Option<&str>,
    ) -> BudgetResult<(usize, IncomeRecord)> {
        let mut income = IncomeRecord::new(person.trim(), source.trim(), amount);
        if let Some(account) = account {
            income = income.with_account(account.trim());
        }

        income
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        self.warn_unknown_account(&income)?;

        let index = self.storage.incomes.append(income.clone())?;
        tracing::info!(person = %income.person, amount = %income.amount, "added income");

        Ok((index, income))
    }

    /// Get the income at a position
    pub fn get(&self, index: usize) -> BudgetResult<IncomeRecord> {
        self.storage
            .incomes
            .get(index)?
            .ok_or_else(|| BudgetError::income_not_found(index))
    }

    /// Get all incomes in file order
    pub fn list(&self) -> BudgetResult<Vec<IncomeRecord>> {
        self.storage.incomes.get_all()
    }

    /// Change an income and rewrite the file
    pub fn update(&self, index: usize, update: IncomeUpdate) -> BudgetResult<IncomeRecord> {
        let mut income = self.get(index)?;

        if let Some(person) = update.person {
            income.person = person.trim().to_string();
        }
        if let Some(source) = update.source {
            income.source = source.trim().to_string();
        }
        if let Some(amount) = update.amount {
            income.amount = amount;
        }
        if let Some(account) = update.account {
            income.account = account.trim().to_string();
        }

        income
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        self.warn_unknown_account(&income)?;

        self.storage.incomes.update(index, income.clone())?;
        self.storage.incomes.save()?;
        tracing::info!(index, person = %income.person, "updated income");

        Ok(income)
    }

    /// Remove an income and rewrite the file
    pub fn delete(&self, index: usize) -> BudgetResult<IncomeRecord> {
        let removed = self.storage.incomes.remove(index)?;
        self.storage.incomes.save()?;
        tracing::info!(index, person = %removed.person, "removed income");
        Ok(removed)
    }

    fn warn_unknown_account(&self, income: &IncomeRecord) -> BudgetResult<()> {
        if let Some(account) = income.target_account() {
            if !self.storage.accounts.name_exists(account)? {
                tracing::warn!(account, "income goes to an account that is not registered");
            }
        }
        Ok(())
    }
}
