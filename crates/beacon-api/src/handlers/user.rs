use axum::Json;
use axum::extract::State;

use crate::dto::{ApiResponse, StatsResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let registry = state.realtime.registry();
    let users = state
        .user_service
        .list_users()
        .await?
        .iter()
        .map(|user| UserResponse::from_user(user, registry.is_online(user.id)))
        .collect();
    Ok(Json(ApiResponse::ok(users)))
}

pub async fn stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<StatsResponse>>, ApiError> {
    let totals = state.user_service.stats().await?;
    let body = StatsResponse {
        total_users: totals.total_users,
        online_users: state.realtime.connection_count(),
        total_messages: totals.total_messages,
    };
    Ok(Json(ApiResponse::ok(body)))
}
