//! Custom error types for the household budget
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for household budget operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The header of a data file matches no known layout
    #[error("Schema error: {0}")]
    Schema(String),
}

impl BudgetError {
    /// Create a "not found" error for an income row
    ///
    /// Takes the zero-based index and reports the number shown by `list`.
    pub fn income_not_found(index: usize) -> Self {
        Self::NotFound {
            entity_type: "Income",
            identifier: format!("#{}", index + 1),
        }
    }

    /// Create a "not found" error for an expense row
    pub fn expense_not_found(index: usize) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: format!("#{}", index + 1),
        }
    }

    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for household budget operations
pub type BudgetResult<T> = Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BudgetError::account_not_found("Gemeinschaftskonto");
        assert_eq!(err.to_string(), "Account not found: Gemeinschaftskonto");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_positional_not_found() {
        assert_eq!(
            BudgetError::expense_not_found(7).to_string(),
            "Expense not found: #8"
        );
        assert_eq!(
            BudgetError::income_not_found(0).to_string(),
            "Income not found: #1"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BudgetError = io_err.into();
        assert!(matches!(err, BudgetError::Io(_)));
    }

    #[test]
    fn test_is_validation() {
        assert!(BudgetError::Validation("x".into()).is_validation());
        assert!(!BudgetError::Storage("x".into()).is_validation());
    }
}
