//! One-shot subcommands: session probe, history dump, manual
//! registration. Each maps its failure mode to an exit code.

use anyhow::Result;
use owo_colors::OwoColorize;

use parada_common::format::{format_date_time, format_duration_short};

use crate::client::{ApiClient, ApiError};
use crate::config::Config;
use crate::controller::{DashboardState, DataEvent};
use crate::errors;

fn exit_code_for(e: &ApiError) -> i32 {
    match e {
        ApiError::Network(_) => errors::EXIT_BACKEND_UNREACHABLE,
        ApiError::SessionExpired => errors::EXIT_SESSION_EXPIRED,
        ApiError::InvalidResponse(_) => errors::EXIT_INVALID_RESPONSE,
        ApiError::Rejected { .. } => errors::EXIT_GENERAL_ERROR,
    }
}

fn bail(e: ApiError) -> ! {
    eprintln!("{}", e.to_string().red());
    std::process::exit(exit_code_for(&e));
}

/// `paradactl status`
pub async fn status(config: &Config, json: bool) -> Result<()> {
    let client = ApiClient::new(&config.api_base)?;
    let status = match client.status().await {
        Ok(s) => s,
        Err(e) => bail(e),
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "logged_in": status.logged_in,
                "username": status.username,
            })
        );
        return Ok(());
    }

    if status.logged_in {
        println!(
            "{} logado como {}",
            "●".green(),
            status.username.as_deref().unwrap_or("-").bold()
        );
    } else {
        println!("{} sem sessão ativa", "●".yellow());
    }
    Ok(())
}

/// `paradactl stops`
pub async fn stops(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.api_base)?;
    let payload = match client.fetch_data().await {
        Ok(p) => p,
        Err(e) => bail(e),
    };

    let mut state = DashboardState::new(&config.machine);
    state.apply(DataEvent::Snapshot { epoch: 0, payload });

    let summary = state.summary();
    println!("{}", format!("Últimas Paradas - {}", config.machine).bold());
    println!(
        "{} paradas, motivo mais comum: {}",
        summary.total_stops(),
        summary.top_reason().bold()
    );
    println!();

    let rows = state.history_rows();
    if rows.is_empty() {
        println!("{}", "Nenhuma parada registrada ainda.".dimmed());
        return Ok(());
    }

    for row in rows {
        let start = row
            .start_local()
            .map(|t| format_date_time(&t))
            .unwrap_or_else(|| "--".to_string());
        println!(
            "{}  {:<20}  {}",
            start.dimmed(),
            row.reason_or("—"),
            format_duration_short(row.duration_min())
        );
    }
    Ok(())
}

/// `paradactl register`
pub async fn register(config: &Config, reason: &str, duration: f64) -> Result<()> {
    let client = ApiClient::new(&config.api_base)?;
    match client.register_stop(reason, duration, &config.machine).await {
        Ok(()) => {
            println!(
                "{} parada registrada: {} ({})",
                "✓".green(),
                reason.bold(),
                format_duration_short(duration)
            );
            Ok(())
        }
        Err(e) => bail(e),
    }
}
