//! Integration tests for the websocket surface, driven by a real client
//! against a server on an ephemeral port.

use std::net::SocketAddr;
use std::time::Duration;

use beacon_database::ChatStore;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::helpers::TestApp;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr, token: &str) -> WsClient {
    let url = format!("ws://{}/ws?token={}", addr, token);
    let (socket, _) = connect_async(url)
        .await
        .expect("Websocket handshake failed");
    socket
}

async fn next_event(socket: &mut WsClient) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("Timed out waiting for an event")
            .expect("Socket closed")
            .expect("Socket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).expect("Event is not JSON");
        }
    }
}

/// Reads events until one of the given type arrives, skipping roster
/// broadcasts and other interleaved traffic.
async fn wait_for(socket: &mut WsClient, event_type: &str) -> Value {
    for _ in 0..25 {
        let event = next_event(socket).await;
        if event["type"] == event_type {
            return event;
        }
    }
    panic!("Never received a {} event", event_type);
}

async fn send_event(socket: &mut WsClient, event: Value) {
    socket
        .send(Message::Text(event.to_string().into()))
        .await
        .expect("Failed to send event");
}

#[tokio::test]
async fn test_ws_rejects_missing_and_bad_tokens() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    assert!(connect_async(format!("ws://{}/ws", addr)).await.is_err());
    assert!(
        connect_async(format!("ws://{}/ws?token=garbage", addr))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_ws_connect_receives_the_online_roster() {
    let app = TestApp::new();
    let token = app.register("alice").await;
    let addr = app.spawn().await;

    let mut alice = connect(addr, &token).await;
    let roster = wait_for(&mut alice, "online_users").await;

    let users = roster["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "alice");
}

#[tokio::test]
async fn test_ws_join_then_message_flow() {
    let app = TestApp::new();
    let alice_token = app.register("alice").await;
    let bob_token = app.register("bob").await;
    let bob_id = app.user_id(&bob_token).await;
    let addr = app.spawn().await;

    let mut alice = connect(addr, &alice_token).await;
    wait_for(&mut alice, "online_users").await;

    let mut bob = connect(addr, &bob_token).await;
    let joined = wait_for(&mut alice, "user_joined").await;
    assert_eq!(joined["username"], "bob");

    let bob_roster = wait_for(&mut bob, "online_users").await;
    assert_eq!(bob_roster["users"].as_array().unwrap().len(), 2);

    send_event(
        &mut alice,
        json!({ "type": "send", "receiver_id": bob_id, "body": "hi bob" }),
    )
    .await;

    let delivered = wait_for(&mut bob, "new_message").await;
    assert_eq!(delivered["message"]["body"], "hi bob");
    assert_eq!(delivered["message"]["sender"]["username"], "alice");

    let ack = wait_for(&mut alice, "message_accepted").await;
    assert_eq!(ack["message"]["body"], "hi bob");
}

#[tokio::test]
async fn test_ws_typing_reaches_the_peer_and_stores_nothing() {
    let app = TestApp::new();
    let alice_token = app.register("alice").await;
    let bob_token = app.register("bob").await;
    let bob_id = app.user_id(&bob_token).await;
    let addr = app.spawn().await;

    let mut alice = connect(addr, &alice_token).await;
    let mut bob = connect(addr, &bob_token).await;

    send_event(
        &mut alice,
        json!({ "type": "typing", "receiver_id": bob_id }),
    )
    .await;

    let typing = wait_for(&mut bob, "user_typing").await;
    assert_eq!(typing["username"], "alice");
    assert_eq!(app.state.store.count_messages().await.unwrap(), 0);
}

#[tokio::test]
async fn test_ws_disconnect_broadcasts_user_left() {
    let app = TestApp::new();
    let alice_token = app.register("alice").await;
    let bob_token = app.register("bob").await;
    let addr = app.spawn().await;

    let mut alice = connect(addr, &alice_token).await;
    wait_for(&mut alice, "online_users").await;

    let mut bob = connect(addr, &bob_token).await;
    wait_for(&mut alice, "user_joined").await;

    bob.close(None).await.expect("Failed to close socket");

    let left = wait_for(&mut alice, "user_left").await;
    assert_eq!(left["username"], "bob");
}

#[tokio::test]
async fn test_ws_message_to_offline_user_is_stored_and_acked() {
    let app = TestApp::new();
    let alice_token = app.register("alice").await;
    let bob_token = app.register("bob").await;
    let bob_id = app.user_id(&bob_token).await;
    let alice_id = app.user_id(&alice_token).await;
    let addr = app.spawn().await;

    // Bob never connects a socket.
    let mut alice = connect(addr, &alice_token).await;
    send_event(
        &mut alice,
        json!({ "type": "send", "receiver_id": bob_id, "body": "see you later" }),
    )
    .await;
    wait_for(&mut alice, "message_accepted").await;

    let history = app
        .request(
            "GET",
            &format!("/api/messages/{}", alice_id),
            None,
            Some(&bob_token),
        )
        .await;
    let messages = history.body["data"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["body"], "see you later");
}

#[tokio::test]
async fn test_ws_unrecognized_frames_report_an_error_event() {
    let app = TestApp::new();
    let token = app.register("alice").await;
    let addr = app.spawn().await;

    let mut alice = connect(addr, &token).await;
    send_event(&mut alice, json!({ "type": "shout", "body": "HI" })).await;

    let error = wait_for(&mut alice, "error").await;
    assert_eq!(error["reason"], "Unrecognized event");
}

#[tokio::test]
async fn test_ws_reconnect_supersedes_the_old_connection() {
    let app = TestApp::new();
    let token = app.register("alice").await;
    let addr = app.spawn().await;

    let mut first = connect(addr, &token).await;
    wait_for(&mut first, "online_users").await;

    let mut second = connect(addr, &token).await;
    wait_for(&mut second, "online_users").await;

    // The displaced socket closing late must not take the user offline.
    first.close(None).await.expect("Failed to close socket");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.body["data"]["is_online"], true);
    assert_eq!(app.state.realtime.connection_count(), 1);
}
