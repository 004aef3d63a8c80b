//! Account model
//!
//! Bank accounts that shared costs are transferred to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// A known bank account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account name, unique ignoring case
    pub name: String,
    /// Holder of the account; empty for joint accounts
    #[serde(default)]
    pub owner: String,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: String::new(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Whether this account is referred to by `name` (case-insensitive)
    pub fn matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        if name.chars().count() > 100 {
            return Err(AccountValidationError::NameTooLong(name.chars().count()));
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.owner.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.owner)
        }
    }
}
