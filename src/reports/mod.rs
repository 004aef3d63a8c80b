//! Reports for the household budget
//!
//! The allocation of shared costs between the partners and the dashboard
//! built on top of it.

pub mod allocation;
pub mod dashboard;

pub use allocation::{AllocationConfig, AllocationReport, PartnerShare, TransferRow};
pub use dashboard::Dashboard;
