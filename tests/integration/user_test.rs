//! Integration tests for the user listing and stats endpoints.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_list_users_requires_auth() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/users", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_never_exposes_password_hashes() {
    let app = TestApp::new();
    let token = app.register("alice").await;
    app.register("bob").await;

    let response = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let users = response.body["data"].as_array().expect("data is not a list");
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password_hash").is_none());
        assert!(user.get("username").is_some());
        assert_eq!(user["is_online"], false);
    }
    // Sorted by username.
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[1]["username"], "bob");
}

#[tokio::test]
async fn test_stats_reports_store_totals() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    app.register("bob").await;
    let bob_id = {
        let bob_token = app.login("bob@test.com", "password123").await;
        app.user_id(&bob_token).await
    };

    app.request(
        "POST",
        "/api/messages",
        Some(serde_json::json!({
            "receiver_id": bob_id,
            "body": "hello",
        })),
        Some(&alice),
    )
    .await;

    let response = app.request("GET", "/api/stats", None, Some(&alice)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_users"], 2);
    assert_eq!(response.body["data"]["total_messages"], 1);
    // No websocket connections in this test.
    assert_eq!(response.body["data"]["online_users"], 0);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["connections"], 0);
}
