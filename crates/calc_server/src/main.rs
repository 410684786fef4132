//! calc395 Server
//!
//! REST API server for statutory interest calculation.

use calc_server::config::{build_config, CliArgs as ConfigCliArgs};
use calc_server::server::Server;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// calc395 Server - REST API for statutory interest calculation
#[derive(Parser, Debug)]
#[command(name = "calc_server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "CALC395_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CALC395_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CALC395_LOG_LEVEL")]
    log_level: Option<String>,

    /// URL of the public key-rate table (CSV, TSV or JSON)
    #[arg(long, env = "CALC395_RATES_URL")]
    rates_url: Option<String>,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            rates_url: args.rates_url,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cli_args: ConfigCliArgs = args.into();
    let config = build_config(&cli_args)?;

    // Initialize tracing
    init_tracing(config.log_level.as_filter_str());

    tracing::info!("calc395 Server v{}", calc_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        rates_source_configured = config.rates_url.is_some(),
        refresh_interval_secs = config.refresh_interval_secs,
        fetch_timeout_secs = config.fetch_timeout_secs,
        "Server configuration loaded"
    );

    // Create and start the server
    let server = Server::new(config)?;
    tracing::info!(address = %server.socket_addr(), "Starting server");

    server.run().await?;

    Ok(())
}
