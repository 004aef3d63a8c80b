//! Income model
//!
//! A monthly income line of one household member (salary, child benefit,
//! support from grandparents, ...).

use serde::{Deserialize, Serialize};

use super::money::Money;

/// Validation errors for income records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    EmptyPerson,
    NegativeAmount,
}

impl std::fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPerson => write!(f, "Income must name a person"),
            Self::NegativeAmount => write!(f, "Income amount cannot be negative"),
        }
    }
}

impl std::error::Error for IncomeValidationError {}

/// A monthly income
///
/// Records have no identifier of their own; they are addressed by their
/// position in the income file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    /// Who receives the income (a partner, or e.g. "Kindergeld")
    pub person: String,
    /// Free-text source ("Gehalt", "Minijob", ...)
    #[serde(default)]
    pub source: String,
    /// Monthly amount
    pub amount: Money,
    /// Account the income is paid into, empty if unspecified
    #[serde(default)]
    pub account: String,
}

impl IncomeRecord {
    /// Create a new income record without a target account
    pub fn new(person: impl Into<String>, source: impl Into<String>, amount: Money) -> Self {
        Self {
            person: person.into(),
            source: source.into(),
            amount,
            account: String::new(),
        }
    }

    /// Set the account the income is paid into
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    /// The target account, if one is set
    pub fn target_account(&self) -> Option<&str> {
        let account = self.account.trim();
        if account.is_empty() {
            None
        } else {
            Some(account)
        }
    }

    /// Validate the income record
    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        if self.person.trim().is_empty() {
            return Err(IncomeValidationError::EmptyPerson);
        }
        if self.amount.is_negative() {
            return Err(IncomeValidationError::NegativeAmount);
        }
        Ok(())
    }
}
