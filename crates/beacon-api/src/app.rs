use std::sync::Arc;

use beacon_auth::{IdentityVerifier, JwtDecoder, JwtEncoder, PasswordHasher};
use beacon_core::{AppConfig, AppResult};
use beacon_database::migration::run_migrations;
use beacon_database::{ChatStore, StoreManager};
use beacon_realtime::RealtimeEngine;
use beacon_service::{HistoryService, UserService};
use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Wires every layer onto one store and one configuration. Shared with
/// the integration tests, which pass in a memory store.
pub fn build_state(config: AppConfig, store: Arc<dyn ChatStore>) -> AppState {
    let config = Arc::new(config);

    // ── Auth ──
    let encoder = Arc::new(JwtEncoder::new(&config.auth));
    let decoder = Arc::new(JwtDecoder::new(&config.auth));
    let hasher = Arc::new(PasswordHasher::new());
    let verifier = Arc::new(IdentityVerifier::new(decoder, Arc::clone(&store)));

    // ── Services ──
    let user_service = Arc::new(UserService::new(
        Arc::clone(&store),
        hasher,
        encoder,
        config.auth.password_min_length,
    ));
    let history_service = Arc::new(HistoryService::new(Arc::clone(&store)));

    // ── Realtime ──
    let realtime = Arc::new(RealtimeEngine::new(
        config.realtime.clone(),
        Arc::clone(&store),
    ));

    AppState {
        config,
        store,
        verifier,
        user_service,
        history_service,
        realtime,
    }
}

/// Connects the store, applies migrations, then serves until a shutdown
/// signal arrives.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    let manager = StoreManager::connect(&config.database).await?;
    if let Some(pool) = manager.pool() {
        run_migrations(pool.pool()).await?;
    }

    let state = build_state(config, manager.store());
    let realtime = Arc::clone(&state.realtime);
    let bind_address = state.config.server.bind_address();
    let router = build_router(state);

    let listener = TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "beacon listening");

    // The engine is shut down inside the signal future: live websockets
    // only wind down once they see the broadcast, and serve waits for
    // them before returning.
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            realtime.shutdown();
        })
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => tracing::warn!(%error, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}
