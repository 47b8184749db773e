//! Libris CLI entry point.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod output;

use commands::Cli;
use libris_core::config::LoggingConfig;
use libris_core::error::AppError;

/// Exit status for a request the namespace refused (missing, foreign,
/// non-empty, cyclic, or invalid).
const EXIT_REJECTED: i32 = 2;
/// Exit status for a failure of the database, blob store, or configuration.
const EXIT_FAILED: i32 = 1;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match commands::load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(&config).await {
        if e.is_structural() {
            output::print_error(&format!("Request rejected: {e}"));
        } else {
            output::print_error(&e.to_string());
        }
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &AppError) -> i32 {
    if err.is_structural() {
        EXIT_REJECTED
    } else {
        EXIT_FAILED
    }
}

/// Initialize tracing/logging
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
