//! paradactl - operator client for the Maroni stoppage dashboard.

use anyhow::Result;
use clap::Parser;

use paradactl::cli::{Cli, Commands};
use paradactl::commands;
use paradactl::config::Config;
use paradactl::tui;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?.with_overrides(cli.api_base, cli.machine);

    match cli.command {
        None => tui::run(&config).await,
        Some(command) => {
            // The TUI owns the terminal; only one-shot commands get
            // stderr log output.
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();

            match command {
                Commands::Status { json } => commands::status(&config, json).await,
                Commands::Stops => commands::stops(&config).await,
                Commands::Register { reason, duration } => {
                    commands::register(&config, &reason, duration).await
                }
            }
        }
    }
}
