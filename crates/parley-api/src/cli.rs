//! CLI definitions for the `parley` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use parley_core::status::StatusReporter;
use parley_types::config::AppConfig;

use crate::state::provider_gateway;

/// Voice mock-interview backend.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./parley.toml when present).
    #[arg(long, global = true, env = "PARLEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as newline-delimited JSON.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Bind address (overrides config and PARLEY_HOST).
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides config and PORT).
        #[arg(long)]
        port: Option<u16>,
    },

    /// Check the OpenAI key and upstream status, printed as JSON.
    Status,
}

/// Print the provider status report.
pub async fn status(config: &AppConfig) -> anyhow::Result<()> {
    let reporter = StatusReporter::new(provider_gateway(config)?);
    let report = reporter.report().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
