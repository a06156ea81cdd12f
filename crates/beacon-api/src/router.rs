use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, health, message, user, ws};
use crate::middleware::{build_cors_layer, request_logging};
use crate::state::AppState;

/// Assembles the full application: REST under `/api`, the realtime
/// socket at `/ws`.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(message_routes())
        .route("/health", get(health::health));

    Router::new()
        .nest("/api", api)
        .route("/ws", get(ws::ws_upgrade))
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(user::list_users))
        .route("/stats", get(user::stats))
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(message::send_message))
        .route("/messages/{peer_id}", get(message::history_with_peer))
        .route("/conversations", get(message::list_conversations))
}
