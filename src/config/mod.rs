//! Configuration module for the household budget
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence (partners, offsets, defaults)

pub mod paths;
pub mod settings;

pub use paths::BudgetPaths;
pub use settings::{HouseholdSettings, Settings};
