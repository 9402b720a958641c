use clap::Parser;
use std::path::PathBuf;

use product_api::config::{load_config, ServiceConfig, StoreBackend};
use product_api::lifecycle::{self, signals, Shutdown};
use product_api::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "product-api")]
#[command(about = "REST API for the product catalogue", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. 127.0.0.1:3000).
    #[arg(short, long)]
    bind: Option<String>,

    /// Keep products in process memory instead of MongoDB.
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if args.memory {
        config.database.backend = StoreBackend::Memory;
    }

    init_logging(&config.observability);
    tracing::info!("product-api v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.database.backend,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let (listener, server) = lifecycle::start(config).await?;

    let shutdown = Shutdown::new();
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));
    tokio::spawn(async move {
        signals::trigger_on_signal(&shutdown).await;
    });

    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
