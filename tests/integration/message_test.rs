//! Integration tests for sending messages and reading history over REST.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

struct Duo {
    app: TestApp,
    alice_token: String,
    alice_id: String,
    bob_token: String,
    bob_id: String,
}

async fn duo() -> Duo {
    let app = TestApp::new();
    let alice_token = app.register("alice").await;
    let bob_token = app.register("bob").await;
    let alice_id = app.user_id(&alice_token).await;
    let bob_id = app.user_id(&bob_token).await;
    Duo {
        app,
        alice_token,
        alice_id,
        bob_token,
        bob_id,
    }
}

#[tokio::test]
async fn test_send_message_persists_and_returns_payload() {
    let d = duo().await;

    let response = d
        .app
        .request(
            "POST",
            "/api/messages",
            Some(json!({ "receiver_id": d.bob_id, "body": "hello bob" })),
            Some(&d.alice_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let message = &response.body["data"];
    assert_eq!(message["body"], "hello bob");
    assert_eq!(message["sender"]["username"], "alice");
    assert_eq!(message["receiver"]["username"], "bob");
    assert!(message["conversation_id"].as_str().is_some());
}

#[tokio::test]
async fn test_send_requires_auth() {
    let d = duo().await;

    let response = d
        .app
        .request(
            "POST",
            "/api/messages",
            Some(json!({ "receiver_id": d.bob_id, "body": "hi" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_to_unknown_receiver_is_not_found() {
    let d = duo().await;

    let response = d
        .app
        .request(
            "POST",
            "/api/messages",
            Some(json!({
                "receiver_id": uuid::Uuid::new_v4().to_string(),
                "body": "hello ghost",
            })),
            Some(&d.alice_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Recipient not found");
}

#[tokio::test]
async fn test_send_rejects_blank_bodies_and_self_sends() {
    let d = duo().await;

    let blank = d
        .app
        .request(
            "POST",
            "/api/messages",
            Some(json!({ "receiver_id": d.bob_id, "body": "   " })),
            Some(&d.alice_token),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let to_self = d
        .app
        .request(
            "POST",
            "/api/messages",
            Some(json!({ "receiver_id": d.alice_id, "body": "hi me" })),
            Some(&d.alice_token),
        )
        .await;
    assert_eq!(to_self.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_is_symmetric_between_participants() {
    let d = duo().await;

    for (token, receiver, body) in [
        (&d.alice_token, &d.bob_id, "one"),
        (&d.bob_token, &d.alice_id, "two"),
        (&d.alice_token, &d.bob_id, "three"),
    ] {
        let response = d
            .app
            .request(
                "POST",
                "/api/messages",
                Some(json!({ "receiver_id": receiver, "body": body })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let alice_view = d
        .app
        .request(
            "GET",
            &format!("/api/messages/{}", d.bob_id),
            None,
            Some(&d.alice_token),
        )
        .await;
    let bob_view = d
        .app
        .request(
            "GET",
            &format!("/api/messages/{}", d.alice_id),
            None,
            Some(&d.bob_token),
        )
        .await;

    assert_eq!(alice_view.status, StatusCode::OK);
    assert_eq!(bob_view.status, StatusCode::OK);

    let bodies: Vec<&str> = alice_view.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, ["one", "two", "three"]);
    assert_eq!(alice_view.body["data"], bob_view.body["data"]);
}

#[tokio::test]
async fn test_history_with_a_stranger_is_empty_not_an_error() {
    let d = duo().await;

    let response = d
        .app
        .request(
            "GET",
            &format!("/api/messages/{}", d.bob_id),
            None,
            Some(&d.alice_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_conversations_resolve_peer_and_snapshot() {
    let d = duo().await;

    d.app
        .request(
            "POST",
            "/api/messages",
            Some(json!({ "receiver_id": d.bob_id, "body": "first" })),
            Some(&d.alice_token),
        )
        .await;
    d.app
        .request(
            "POST",
            "/api/messages",
            Some(json!({ "receiver_id": d.alice_id, "body": "latest" })),
            Some(&d.bob_token),
        )
        .await;

    let response = d
        .app
        .request("GET", "/api/conversations", None, Some(&d.alice_token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let conversations = response.body["data"].as_array().unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0]["peer_username"], "bob");
    assert_eq!(conversations[0]["last_message_text"], "latest");
}
