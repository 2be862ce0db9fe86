//! Santa Studio server - single binary serving the API and the console.

use santa_studio::adapters::http::{router, AppState};
use santa_studio::config::{ApiMode, AppConfig};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    match &config.mode {
        ApiMode::Live { .. } => info!(
            script_model = config.script_model.as_str(),
            video_model = config.video_model.as_str(),
            "Running in live mode"
        ),
        ApiMode::Offline => warn!("No API key configured, every generation answers with mock data"),
    }

    let shutdown = CancellationToken::new();
    let state = match AppState::from_config(&config, shutdown.clone()) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(format!("{}:{}", config.addr, config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = config.addr.as_str(), port = config.port.as_str(), "Failed to bind TCP listener");
            std::process::exit(1);
        }
    };
    info!("Listening at {}:{}", config.addr, config.port);

    let signal = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
            signal.cancel();
        })
        .await;

    if let Err(e) = served {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
