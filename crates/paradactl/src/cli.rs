//! CLI - Command-line argument parsing.
//!
//! Defines the CLI structure using clap. Keeps argument parsing
//! separate from execution logic; without a subcommand paradactl
//! starts the interactive dashboard.

use clap::{Parser, Subcommand};

/// Maroni stoppage monitor client
#[derive(Parser)]
#[command(name = "paradactl")]
#[command(about = "Indústria Maroni - Monitoramento I4.0", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Monitored machine (overrides the config file)
    #[arg(long, global = true)]
    pub machine: Option<String>,

    /// Subcommand (if not provided, starts the interactive dashboard)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Probe the backend session and print who is logged in
    Status {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Print the recent stoppage history for the monitored machine
    Stops,

    /// Register a manual stoppage (requires an active session cookie)
    Register {
        /// Stoppage reason
        #[arg(long, default_value = "Setup")]
        reason: String,

        /// Duration in minutes, fractional allowed
        #[arg(long)]
        duration: f64,
    },
}
