//! household-budget - Household budget tracker for two partners
//!
//! Records incomes and recurring expenses in flat CSV files and works out
//! how the partners split their shared costs: family income such as child
//! benefit reduces every shared expense pro rata, and the rest is divided
//! either by the partners' income ratio or 50/50. The result is a monthly
//! transfer amount per partner and payment account.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (incomes, expenses, accounts, money)
//! - `storage`: CSV file storage with versioned layouts
//! - `services`: Business logic layer
//! - `reports`: Shared-cost allocation and the dashboard
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use household_budget::config::{paths::BudgetPaths, settings::Settings};
//! use household_budget::reports::AllocationReport;
//! use household_budget::storage::Storage;
//!
//! let paths = BudgetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let report = AllocationReport::compute(
//!     &storage.incomes.get_all()?,
//!     &storage.expenses.get_all()?,
//!     &settings.allocation_config(),
//! );
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
