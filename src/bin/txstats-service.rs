//! HTTP service binary for txstats
//!
//! Accepts transactions on `POST /transactions` and reports the statistics of
//! the trailing window on `GET /statistics`.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use txstats::{HttpServer, ServiceConfig, TransactionService};

#[derive(Parser)]
#[command(name = "txstats-service")]
#[command(about = "Sliding-window transaction statistics service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// HTTP service port (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Window length in seconds (overrides the config file)
    #[arg(long)]
    window_seconds: Option<u64>,

    /// Bucket width in milliseconds (overrides the config file)
    #[arg(long)]
    bucket_millis: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ServiceConfig::default(),
        };

        if let Some(host) = self.host {
            config.http.host = host;
        }
        if let Some(port) = self.port {
            config.http.port = port;
        }
        if let Some(seconds) = self.window_seconds {
            config.window.seconds = seconds;
        }
        if let Some(millis) = self.bucket_millis {
            config.window.bucket_millis = millis;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    txstats::init_tracing(args.json_logs, level);

    if let Some(path) = &args.config {
        info!("Loading configuration from: {}", path.display());
    }
    let config = args.into_config()?;
    let window = config
        .window_config()
        .context("invalid window configuration")?;

    info!(
        "Starting txstats service (window: {:?}, buckets of {:?})",
        window.window, window.granularity
    );

    let service = TransactionService::from_config(window)?;
    let server = HttpServer::new(service, config.http.clone())?;

    info!("Service ready");
    info!("  Statistics: http://{}/statistics", server.addr());
    info!("Press Ctrl+C to shutdown");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };

    server.run(shutdown).await?;

    info!("Service stopped");
    Ok(())
}
