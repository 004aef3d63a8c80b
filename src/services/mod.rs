//! Service layer for the household budget
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation and normalization of user input.

pub mod account;
pub mod expense;
pub mod income;

pub use account::AccountService;
pub use expense::{ExpenseService, ExpenseUpdate, NewExpense};
pub use income::{IncomeService, IncomeUpdate};
