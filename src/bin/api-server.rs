//! Adaptrix API Server
//!
//! Stateless HTTP API evaluating adaptive indicator signals on request.
//! Safe to scale horizontally: every request carries its own price window.

use adaptrix::config::{get_environment, get_port, EngineConfig};
use adaptrix::core::http::start_server;
use adaptrix::logging;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let port = get_port();
    let config = EngineConfig::from_env();
    config.validate()?;

    info!("Starting Adaptrix API Server");
    info!(environment = %get_environment(), "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);
    info!(
        min_confidence = config.fusion.min_confidence,
        balance = config.risk.balance,
        max_risk_per_trade = config.risk.max_risk_per_trade,
        "Engine configuration"
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
