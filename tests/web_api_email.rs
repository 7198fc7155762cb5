//! Web API Email Tests
//!
//! Integration tests for the `/email` endpoints.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use common::{create_json_server, create_registry};
use mailing_list::db::BATCH_QUERY_ERROR;
use mailing_list::MailingList;

async fn create_test_server() -> (TestServer, MailingList) {
    let registry = create_registry().await;
    let server = create_json_server(registry.clone());
    (server, registry)
}

async fn create_email(server: &TestServer, email: &str) -> Value {
    let response = server
        .post("/email/create")
        .json(&json!({ "Email": email }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

async fn get_email(server: &TestServer, email: &str) -> Value {
    let response = server
        .get("/email/get")
        .json(&json!({ "Email": email }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

async fn get_batch(server: &TestServer, page: i64, count: i64) -> Vec<Value> {
    let response = server
        .get("/email/getbatch")
        .json(&json!({ "Page": page, "Count": count }))
        .await;
    response.assert_status_ok();
    response.json::<Vec<Value>>()
}

#[tokio::test]
async fn test_create_then_get() {
    let (server, _) = create_test_server().await;

    let created = create_email(&server, "a@example.com").await;
    assert_eq!(created["Email"], "a@example.com");
    assert_eq!(created["OptOut"], false);
    assert!(created["ConfirmedAt"].is_null());
    assert!(created["Id"].as_i64().unwrap() > 0);

    let found = get_email(&server, "a@example.com").await;
    assert_eq!(found, created);
}

#[tokio::test]
async fn test_create_duplicate_is_bad_request() {
    let (server, _) = create_test_server().await;

    let original = create_email(&server, "a@example.com").await;

    let response = server
        .post("/email/create")
        .json(&json!({ "Email": "a@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["Err"].as_str().unwrap().contains("duplicate"));

    // Original row is unchanged
    assert_eq!(get_email(&server, "a@example.com").await, original);
}

#[tokio::test]
async fn test_create_requires_email() {
    let (server, _) = create_test_server().await;

    for body in [json!({}), json!({ "Email": "" }), json!({ "Email": "   " })] {
        let response = server.post("/email/create").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["Err"].is_string());
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/email/create")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["Err"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_body_read_without_json_content_type() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/email/create")
        .content_type("application/x-www-form-urlencoded")
        .bytes(r#"{"Email":"a@example.com"}"#.into())
        .await;
    response.assert_status_ok();
    let created: Value = response.json();
    assert_eq!(created["Email"], "a@example.com");

    let response = server
        .get("/email/get")
        .bytes(r#"{"Email":"a@example.com"}"#.into())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), created);

    let response = server
        .get("/email/getbatch")
        .text(r#"{"Page":1,"Count":10}"#)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 1);
}

#[tokio::test]
async fn test_get_unknown_is_null() {
    let (server, _) = create_test_server().await;

    let response = server
        .get("/email/get")
        .json(&json!({ "Email": "nobody@example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), Value::Null);
}

#[tokio::test]
async fn test_update_creates_missing_entry() {
    let (server, _) = create_test_server().await;

    let response = server
        .put("/email/update")
        .json(&json!({
            "Email": "new@example.com",
            "ConfirmedAt": "1998-10-01T00:00:00Z",
            "OptOut": false
        }))
        .await;
    response.assert_status_ok();

    let entry: Value = response.json();
    assert_eq!(entry["Email"], "new@example.com");
    assert_eq!(entry["ConfirmedAt"], "1998-10-01T00:00:00Z");
}

#[tokio::test]
async fn test_update_overwrites_and_keeps_id() {
    let (server, registry) = create_test_server().await;

    create_email(&server, "first@example.com").await;
    let created = create_email(&server, "a@example.com").await;

    let response = server
        .put("/email/update")
        .json(&json!({
            "Id": 999,
            "Email": "a@example.com",
            "ConfirmedAt": "1998-10-01T00:00:00Z",
            "OptOut": true
        }))
        .await;
    response.assert_status_ok();

    let updated: Value = response.json();
    assert_eq!(updated["Id"], created["Id"]);
    assert_eq!(updated["OptOut"], true);

    // Timestamp is stored as the exact epoch value
    let stored = registry.get("a@example.com").await.unwrap().unwrap();
    assert_eq!(stored.confirmed_at, 907_200_000);
}

#[tokio::test]
async fn test_update_clears_confirmation() {
    let (server, _) = create_test_server().await;

    server
        .put("/email/update")
        .json(&json!({ "Email": "a@example.com", "ConfirmedAt": "1998-10-01T00:00:00Z" }))
        .await
        .assert_status_ok();

    let response = server
        .put("/email/update")
        .json(&json!({ "Email": "a@example.com", "ConfirmedAt": null, "OptOut": false }))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["ConfirmedAt"].is_null());
}

#[tokio::test]
async fn test_update_keeps_extreme_timestamps() {
    let (server, registry) = create_test_server().await;

    for (email, epoch) in [
        ("max@example.com", i64::MAX),
        ("min@example.com", i64::MIN),
        ("far@example.com", 10_000_000_000_000),
    ] {
        let response = server
            .put("/email/update")
            .json(&json!({ "Email": email, "ConfirmedAt": epoch }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["ConfirmedAt"], json!(epoch));

        let stored = registry.get(email).await.unwrap().unwrap();
        assert_eq!(stored.confirmed_at, epoch);
    }

    create_email(&server, "plain@example.com").await;
    assert_eq!(get_batch(&server, 1, 10).await.len(), 4);
}

#[tokio::test]
async fn test_delete_soft_deletes() {
    let (server, _) = create_test_server().await;

    create_email(&server, "a@example.com").await;

    let response = server
        .post("/email/delete")
        .json(&json!({ "Email": "a@example.com" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["OptOut"], true);

    // Still readable
    let found = get_email(&server, "a@example.com").await;
    assert_eq!(found["OptOut"], true);

    // Excluded from pages
    assert!(get_batch(&server, 1, 10).await.is_empty());
}

#[tokio::test]
async fn test_delete_unknown_is_null() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/email/delete")
        .json(&json!({ "Email": "nobody@example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), Value::Null);
}

#[tokio::test]
async fn test_getbatch_pages() {
    let (server, _) = create_test_server().await;

    for i in 1..=5 {
        create_email(&server, &format!("user{i}@example.com")).await;
    }

    let emails = |page: Vec<Value>| -> Vec<String> {
        page.iter()
            .map(|e| e["Email"].as_str().unwrap().to_string())
            .collect()
    };

    assert_eq!(
        emails(get_batch(&server, 1, 2).await),
        ["user1@example.com", "user2@example.com"]
    );
    assert_eq!(
        emails(get_batch(&server, 2, 2).await),
        ["user3@example.com", "user4@example.com"]
    );
    assert_eq!(
        emails(get_batch(&server, 3, 2).await),
        ["user5@example.com"]
    );
    assert!(get_batch(&server, 4, 2).await.is_empty());
}

#[tokio::test]
async fn test_getbatch_rejects_invalid_params() {
    let (server, _) = create_test_server().await;

    let bodies = [
        json!({ "Page": 0, "Count": 2 }),
        json!({ "Page": 1, "Count": 0 }),
        json!({ "Page": 1, "Count": -3 }),
        json!({ "Page": -1, "Count": 2 }),
        json!({ "Count": 2 }),
        json!({}),
    ];

    for body in bodies {
        let response = server.get("/email/getbatch").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "Err": BATCH_QUERY_ERROR }),
            "body: {body}"
        );
    }
}

#[tokio::test]
async fn test_wrong_method_is_method_not_allowed() {
    let (server, _) = create_test_server().await;

    let response = server
        .put("/email/create")
        .json(&json!({ "Email": "a@example.com" }))
        .await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);

    // Nothing was created
    assert_eq!(get_email(&server, "a@example.com").await, Value::Null);
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let (server, registry) = create_test_server().await;
    registry.database().close().await;

    let response = server
        .get("/email/get")
        .json(&json!({ "Email": "a@example.com" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "Err": "An internal error occurred" })
    );
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}
