use axum::Json;
use axum::extract::State;
use beacon_database::ChatStore;

use crate::dto::HealthResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Liveness probe. Fails with a storage error when the backing store
/// stops answering.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.health_check().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        connections: state.realtime.connection_count(),
    }))
}
