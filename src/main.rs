//! pipeline-hello entry point.
//!
//! Initializes tracing, resolves configuration, binds the listener and serves
//! until SIGTERM/SIGINT. Configuration and bind failures exit non-zero.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pipeline_hello::{config::AppConfig, create_router, start_server, telemetry};

/// pipeline-hello: answers GET / to confirm a deployment is reachable
#[derive(Parser, Debug)]
#[command(name = "pipeline-hello", version, about)]
struct Args {
    /// Optional TOML configuration file (defaults to 0.0.0.0:5000)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "pipeline_hello=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match AppConfig::resolve(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pipeline-hello: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_filter = telemetry::resolve_log_filter(args.log_level, std::env::var("RUST_LOG").ok());
    telemetry::init_tracing(&log_filter, &config.logging);

    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        log_format = %config.logging.format,
        "Loaded configuration"
    );

    match start_server(create_router(), &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
