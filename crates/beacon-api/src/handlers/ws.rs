use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use beacon_auth::Identity;
use beacon_core::AppError;
use beacon_realtime::ClientEvent;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::extractors::token_from_headers;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

/// Upgrades `/ws` after verifying the token. Browsers cannot set headers
/// on a websocket handshake, so a `?token=` query parameter is accepted
/// alongside the cookie and bearer forms. A bad token fails the
/// handshake with a plain 401 before any upgrade happens.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let token = query
        .token
        .or_else(|| token_from_headers(&headers))
        .ok_or_else(|| AppError::unauthorized("Missing authentication token"))?;
    let identity = state.verifier.verify(&token).await?;

    Ok(ws.on_upgrade(move |socket| run_connection(socket, state, identity)))
}

/// Drives one websocket for its whole life: activates the session, pumps
/// outbound events, and feeds inbound frames back into it.
async fn run_connection(socket: WebSocket, state: AppState, identity: Identity) {
    let user_id = identity.user_id;
    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut session = state.realtime.begin_session();
    if let Err(error) = session.authenticate(identity) {
        warn!(user_id = %user_id, %error, "websocket session rejected");
        return;
    }
    let mut events = match session.activate() {
        Ok(events) => events,
        Err(error) => {
            warn!(user_id = %user_id, %error, "websocket session failed to activate");
            return;
        }
    };
    debug!(user_id = %user_id, "websocket connected");

    // Outbound pump. Runs until the event channel closes, which happens
    // when the session (and with it the connection handle) is dropped.
    let writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(error) => {
                    warn!(%error, "failed to serialize outbound event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let mut shutdown = state.realtime.shutdown_receiver();
    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => session.handle_event(event).await,
                        Err(error) => {
                            debug!(user_id = %user_id, %error, "unparseable client frame");
                            session.report_error("Unrecognized event");
                        }
                    },
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
                // A reconnect elsewhere displaces this connection. The
                // frame that just arrived was still handled, then the
                // socket winds down.
                if !session.is_open() {
                    debug!(user_id = %user_id, "connection superseded by a newer one");
                    break;
                }
            }
        }
    }

    session.close();
    // Dropping the session releases the event sender, so the writer
    // drains whatever is queued and closes the socket on its own.
    drop(session);
    if let Err(error) = writer.await {
        debug!(user_id = %user_id, %error, "websocket writer ended abruptly");
    }
    debug!(user_id = %user_id, "websocket disconnected");
}
