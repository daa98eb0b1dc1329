//! palato-probe CLI library
//!
//! Command-line front end for the palato-probe scenarios: argument parsing,
//! progress output and the sequential scenario runner.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, ListArgs, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
pub use runner::{RunSummary, ScenarioRunner};
