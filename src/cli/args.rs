//! CLI argument definitions using clap
//!
//! Commands:
//! - northwind init [--reset] --config <path>
//! - northwind load --config <path>
//! - northwind serve --config <path>
//! - northwind stats --session <id> --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Northwind dataset query service
#[derive(Parser, Debug)]
#[command(name = "northwind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the dataset and audit tables
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./northwind.json")]
        config: PathBuf,

        /// Drop every table before creating it
        #[arg(long)]
        reset: bool,
    },

    /// Reload the business tables from the data directory
    Load {
        /// Path to configuration file
        #[arg(long, default_value = "./northwind.json")]
        config: PathBuf,
    },

    /// Initialize, load and start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./northwind.json")]
        config: PathBuf,
    },

    /// Print usage statistics and history for a session
    Stats {
        /// Path to configuration file
        #[arg(long, default_value = "./northwind.json")]
        config: PathBuf,

        /// Session identifier
        #[arg(long, default_value = "1")]
        session: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
