//! Beacon server entry point.
//!
//! Loads configuration for the selected environment, sets up logging,
//! and hands off to the API crate's server runner.

use tracing_subscriber::{EnvFilter, fmt};

use beacon_core::AppConfig;

#[tokio::main]
async fn main() {
    let env = std::env::var("BEACON_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Starting Beacon v{} (env: {})", env!("CARGO_PKG_VERSION"), env);

    if let Err(e) = beacon_api::app::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
