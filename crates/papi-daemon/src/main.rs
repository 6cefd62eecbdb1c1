//! Policy API daemon - REST lifecycle service for TOSCA policy types and
//! policies
//!
//! The daemon provides:
//! - CRUD over policy types and policies with version selection
//! - Deletion integrity rules against PDP group deployment state
//! - A legacy guard policy adapter
//! - Healthcheck and invocation statistics

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use papi_daemon::config::{self, DaemonConfig};
use papi_daemon::error::{DaemonError, DaemonResult};
use papi_daemon::server::Server;

/// Policy API daemon CLI
#[derive(Parser)]
#[command(name = "papid")]
#[command(about = "Policy API daemon - TOSCA policy lifecycle service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PAPI_CONFIG")]
    config_file: PathBuf,

    /// Listen address override
    #[arg(short, long, env = "PAPI_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level
    #[arg(long, env = "PAPI_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "PAPI_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // The configuration file must name an existing readable file before
    // anything else comes up
    config::validate_config_file(&cli.config_file)?;

    // Load configuration
    let path = cli
        .config_file
        .to_str()
        .ok_or_else(|| DaemonError::Config("config file path is not valid UTF-8".to_string()))?;
    let mut config =
        DaemonConfig::load(Some(path)).map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }

    Server::new(config)?.run().await
}
