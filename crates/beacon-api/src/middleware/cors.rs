use axum::http::{HeaderValue, Method};
use beacon_core::config::CorsConfig;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Builds the CORS layer from configuration. A literal `*` opens the
/// API up; otherwise only the listed origins are allowed, with
/// unparseable entries skipped.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "skipping unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
