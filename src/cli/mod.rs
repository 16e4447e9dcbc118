//! CLI module for northwind
//!
//! Provides command-line interface for:
//! - init: Create (or recreate) the tables
//! - load: Reload the business tables from source files
//! - serve: Boot and serve HTTP
//! - stats: Print a session's usage statistics

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, load, run_command, serve, stats, Config};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
