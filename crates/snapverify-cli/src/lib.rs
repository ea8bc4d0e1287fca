//! Snapverify CLI library
//!
//! Command definitions, configuration layering and handlers for the
//! `snapverify` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    CleanupArgs, Cli, ColorArg, Commands, CompareArgs, ConfigArgs, CsvArgs, DataArgs, DataCommand,
    SheetArgs,
};
pub use config::{load_artifacts, CliConfig, ColorChoice, DirOverrides, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{percent, Reporter};
