//! Core data models for the household budget
//!
//! Incomes, expenses and accounts as they look after deserialization: every
//! enumerated field is a real enum, every amount a parsed `Money`.

pub mod account;
pub mod expense;
pub mod income;
pub mod money;

pub use account::Account;
pub use expense::{
    parse_shared_flag, shared_flag_str, ExpenseRecord, Frequency, SplitMode, UNKNOWN_ACCOUNT,
};
pub use income::IncomeRecord;
pub use money::{Money, MoneyParseError};
