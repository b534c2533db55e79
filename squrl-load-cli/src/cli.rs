//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the canonical journey once per session and print the metrics snapshot
    Run {
        /// Number of concurrent sessions
        #[arg(long, value_name = "N", default_value_t = 1)]
        sessions: usize,

        /// Override the target base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// File with seed short codes, one per line
        #[arg(long, value_name = "PATH")]
        seeds: Option<PathBuf>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a sample configuration file
    Sample,

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file (defaults to --config)
        #[arg(long, value_name = "PATH")]
        config_file: Option<PathBuf>,
    },
}
