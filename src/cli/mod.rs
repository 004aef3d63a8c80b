//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod data;
pub mod expense;
pub mod income;
pub mod report;

pub use account::{handle_account_command, AccountCommands};
pub use data::{handle_check, handle_migrate};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use report::{handle_dashboard, handle_transfers};

use crate::error::{BudgetError, BudgetResult};
use crate::models::Money;

/// Turn the number shown by `list` into a zero-based position
pub(crate) fn position(number: usize) -> BudgetResult<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| BudgetError::Validation("Numbers start at 1, see 'list'".into()))
}

/// Parse an amount argument
pub(crate) fn parse_amount(amount: &str) -> BudgetResult<Money> {
    Money::parse(amount).map_err(|e| {
        BudgetError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '1200.50' or '1200,50'. Error: {}",
            amount, e
        ))
    })
}
