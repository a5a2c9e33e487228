//! octane-migrate: moves manual tests from a legacy CSV export into ALM Octane
//!
//! Each data row of the export becomes a manual test with its step script and
//! a parameter table attached.

pub mod cli;
pub mod core;
pub mod octane;
