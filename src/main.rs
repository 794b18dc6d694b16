//! Todo REST API server.
//!
//! A small CRUD service over a single todos table, fronted by a per-client
//! token-bucket admission limiter. Built with Tokio and Axum.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use todo_api::config::{load_config, AppConfig};
use todo_api::http::HttpServer;
use todo_api::lifecycle::{wait_for_signal, Shutdown};
use todo_api::observability::{logging, metrics};
use todo_api::db;

#[derive(Parser, Debug)]
#[command(name = "todo-api", about = "Todo REST API with per-client rate limiting")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("todo_api=debug,tower_http=debug");

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        database_url = %config.database.url,
        rate_limit_enabled = config.rate_limit.enabled,
        requests_per_second = config.rate_limit.requests_per_second,
        burst_size = config.rate_limit.burst_size,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(err) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %err,
                "failed to parse metrics address"
            ),
        }
    }

    let pool = db::connect(&config.database).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, pool);
    let signal = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, signal).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
