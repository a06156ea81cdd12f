use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use beacon_core::UserId;
use beacon_entity::Message;
use beacon_realtime::MessagePayload;
use beacon_service::ConversationSummary;

use crate::dto::{ApiResponse, SendMessageRequest};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// REST path for sending. Goes through the same coordinator as the
/// websocket `send` event, so an online receiver gets the live push
/// either way.
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessagePayload>>), ApiError> {
    let message = state
        .realtime
        .coordinator()
        .send_message(&ctx.identity(), payload.receiver_id, &payload.body)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}

pub async fn history_with_peer(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(peer_id): Path<UserId>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let messages = state
        .history_service
        .history_with_peer(ctx.user_id, peer_id)
        .await?;
    Ok(Json(ApiResponse::ok(messages)))
}

pub async fn list_conversations(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<ApiResponse<Vec<ConversationSummary>>>, ApiError> {
    let summaries = state.history_service.conversations_for(ctx.user_id).await?;
    Ok(Json(ApiResponse::ok(summaries)))
}
