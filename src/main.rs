//! logfan server
//!
//! Streams the process log to WebSocket subscribers.
//!
//! ```text
//!   log call ──▶ RoutingCore ──▶ Sampler ──▶ Tee ──┬──▶ console (stderr)
//!                                                 └──▶ ConnectionPool ──▶ /logs clients
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use logfan::config::{load_config, LogfanConfig};
use logfan::http::HttpServer;
use logfan::lifecycle::{signals, Shutdown};
use logfan::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "logfan")]
#[command(about = "Stream sampled process logs to WebSocket subscribers", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `server.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LogfanConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    let assembly = logfan::init(&config)?;
    logging::init_tracing(assembly.logger().clone())?;

    tracing::info!(
        bind_address = %config.server.bind_address,
        subscriber_queue = config.server.subscriber_queue,
        unsampled_logger = %config.sampling.unsampled_logger,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen(shutdown.clone()));

    let server = HttpServer::new(assembly.clone(), &config.server, shutdown);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    let _ = assembly.logger().sync();
    Ok(())
}
