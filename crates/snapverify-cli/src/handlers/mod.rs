//! Command handlers
//!
//! Each module holds the execution logic for one subcommand plus its tests.

pub mod cleanup;
pub mod compare;
pub mod config;
pub mod data;

pub use cleanup::execute_cleanup;
pub use compare::execute_compare;
pub use config::execute_config;
pub use data::execute_data;
