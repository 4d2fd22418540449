//! Location record inspector
//!
//! Reads wire records as hex (or records as JSON) from stdin, one per line,
//! and writes the converted form to stdout. Useful for reading captured
//! position-sync packets.

use tokio::io::{stdin, stdout, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use location_sync::config::Config;
use location_sync::inspect;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    info!("Starting location record inspector");
    info!(
        record_offset = config.record_offset,
        pretty = config.output_pretty,
        "Reading records from stdin"
    );

    let stopped_by_signal = tokio::select! {
        result = inspect::run(BufReader::new(stdin()), stdout(), &config) => {
            result?;
            false
        }
        _ = shutdown_signal() => true,
    };

    info!("Inspector shutdown complete");

    if stopped_by_signal {
        // A pending stdin read sits on a blocking thread the runtime would
        // wait for on drop
        std::process::exit(0);
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    // stdout carries converted records, logs go to stderr
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping");
        }
        _ = terminate => {
            info!("Received terminate signal, stopping");
        }
    }
}
