mod cli;
mod clients;
mod config;
mod db;
mod errors;
mod models;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use clap::Parser;
use cli::Cli;
use config::Config;
use std::panic;
use std::process::ExitCode;
use tracing::{error, info, info_span, warn, Instrument};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Diagnostics go to stderr; stdout carries the JSON responses
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "vachaar_smoke=debug,sqlx=warn,info".into()
        }))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });
    cli.apply_overrides(&mut config);

    let run_id = Uuid::new_v4();
    let span = info_span!("run", id = %run_id);
    info!(parent: &span, "Targeting {} (database {})", config.base_url, redact_db_url(&config.db_url));

    match cli::execute_command(cli, config).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

// Keep credentials out of the logs
fn redact_db_url(db_url: &str) -> String {
    match (db_url.find("://"), db_url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &db_url[..scheme_end], &db_url[at..])
        }
        _ => db_url.to_string(),
    }
}
