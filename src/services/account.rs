//! Account service
//!
//! Provides business logic for the account registry. Accounts are the
//! targets of the monthly transfers; names are unique regardless of case.

use crate::error::{BudgetError, BudgetResult};
use crate::models::Account;
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new account
    pub fn add(&self, name: &str, owner: Option<&str>) -> BudgetResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BudgetError::Validation(
                "Account name cannot be empty".into(),
            ));
        }

        // Check for duplicate name
        if self.storage.accounts.name_exists(name)? {
            return Err(BudgetError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let account = Account::new(name).with_owner(owner.map(str::trim).unwrap_or_default());
        account
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.accounts.insert(account.clone())?;
        self.storage.accounts.save()?;
        tracing::info!(name = %account.name, "added account");

        Ok(account)
    }

    /// Get all accounts
    pub fn list(&self) -> BudgetResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    /// Remove an account from the registry
    ///
    /// Records that still name the account keep it; it only stops being
    /// offered as a known account.
    pub fn delete(&self, name: &str) -> BudgetResult<Account> {
        let removed = self
            .storage
            .accounts
            .remove(name)?
            .ok_or_else(|| BudgetError::account_not_found(name))?;
        self.storage.accounts.save()?;
        tracing::info!(name = %removed.name, "removed account");
        Ok(removed)
    }
}
