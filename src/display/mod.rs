//! Display formatting for terminal output
//!
//! Provides utilities for formatting records and reports for terminal
//! display, as tables and text summaries.

pub mod account;
pub mod expense;
pub mod income;
pub mod report;
pub mod transfer;

pub use account::format_account_list;
pub use expense::{format_category_list, format_expense_list};
pub use income::format_income_list;
pub use report::format_skipped_rows;
pub use transfer::format_transfer_table;
