//! chartd: OCCON chart data daemon.
//!
//! Serves the aggregated chart over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use occon_chart::server::config::Config;
use occon_chart::source::WikidotClient;
use occon_chart::{ChartDataService, ChartError};

/// OCCON chart daemon serving cached rating aggregates.
#[derive(Parser)]
#[command(name = "chartd")]
#[command(version = occon_chart::PKG_VERSION)]
#[command(about = "OCCON chart data daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "CHARTD_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load(args.config.as_deref())?;

    let source = WikidotClient::new(config.wikidot_config())?;
    let service = ChartDataService::new(Arc::new(source), config.service_config());

    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| ChartError::Configuration(format!("Invalid address: {e}")))?;

    let listener = TcpListener::bind(addr).await?;
    info!(version = occon_chart::version_string(), %addr, site = %config.wikidot.site, "chartd starting");

    axum::serve(listener, occon_chart::server::router(Arc::new(service)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("chartd stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C signal"),
        _ = terminate => info!("received terminate signal"),
    }
}
