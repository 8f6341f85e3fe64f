//! vetclaim - a command line assistant for VA disability claims.
//!
//! Calculates combined ratings and monthly compensation, checks presumptive
//! eligibility, and keeps a local profile of disabilities, claims, symptom
//! logs and drafted documents.

mod cli;
mod commands;
mod render;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use vetclaim_core::Config;

/// Log files are kept under the data directory
const LOG_DIR: &str = "logs";

/// Initialize the tracing subscriber for logging.
///
/// Events go to stderr and to a daily log file. The returned guard flushes
/// the file writer and must live until exit.
fn init_tracing(data_dir: &Path) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("vetclaim")
        .filename_suffix("log")
        .build(data_dir.join(LOG_DIR));

    let (file_layer, guard, file_error) = match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    if let Some(e) = file_error {
        warn!(error = %e, "File logging disabled");
    }
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::load()?;
    let _guard = init_tracing(&config.data_dir()?);
    info!(version = env!("CARGO_PKG_VERSION"), "vetclaim starting");

    commands::run(cli, config).await
}
