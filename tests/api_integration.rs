//! API integration tests.
//!
//! These tests drive the full router end-to-end using axum's test utilities.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use session_ledger::api::{create_router, create_router_with_state, AppState, SessionCookie};
use session_ledger::{Ledger, SqliteLedger};
use tower::ServiceExt;

/// Helper to create a JSON request, optionally carrying a session cookie.
fn json_request(method: Method, uri: &str, session: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("sessionId={}", token));
    }

    match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Helper to extract body as string.
async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).to_string()
}

/// Helper to extract JSON from response.
async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// Session token from a `Set-Cookie: sessionId=...` header, if any.
fn session_from(response: &axum::response::Response) -> Option<String> {
    let value = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = value.split(';').next()?;
    pair.strip_prefix("sessionId=").map(str::to_string)
}

async fn post_transaction(app: &Router, session: Option<&str>, body: Value) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(Method::POST, "/transactions", session, Some(body)))
        .await
        .unwrap()
}

async fn get_json(app: &Router, uri: &str, session: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request(Method::GET, uri, Some(session), None))
        .await
        .unwrap();
    let status = response.status();
    (status, response_json(response).await)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router();

    let response = app
        .oneshot(json_request(Method::GET, "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_text(response).await, "OK");
}

// ============================================================================
// Session identity
// ============================================================================

#[tokio::test]
async fn test_post_without_session_mints_one() {
    let app = create_router();

    let response = post_transaction(
        &app,
        None,
        json!({ "title": "Salary", "amount": 5000, "type": "credit" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(session_from(&response).is_some());
    assert!(response_text(response).await.is_empty());

    let token = cookie
        .split(';')
        .next()
        .and_then(|p| p.strip_prefix("sessionId="))
        .unwrap()
        .to_string();

    let (status, json) = get_json(&app, "/transactions", &token).await;
    assert_eq!(status, StatusCode::OK);
    let transactions = json["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["title"], "Salary");
    assert_eq!(transactions[0]["amount"], 5000.0);
    assert_eq!(transactions[0]["session_id"], token.as_str());
}

#[tokio::test]
async fn test_post_with_session_does_not_reissue() {
    let app = create_router();

    let response = post_transaction(
        &app,
        Some("existing-token"),
        json!({ "title": "Lunch", "amount": 12.5, "type": "debit" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let (_, json) = get_json(&app, "/transactions", "existing-token").await;
    assert_eq!(json["transactions"][0]["amount"], -12.5);
}

#[tokio::test]
async fn test_reads_require_session() {
    let app = create_router();

    for uri in [
        "/transactions",
        "/transactions/summary",
        "/transactions/6f9619ff-8b86-4011-b42d-00c04fc964ff",
    ] {
        let response = app
            .clone()
            .oneshot(json_request(Method::GET, uri, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let json = response_json(response).await;
        assert_eq!(json["code"], "SESSION_REQUIRED");
    }
}

#[tokio::test]
async fn test_custom_cookie_name() {
    let state = AppState::with_ledger(
        Ledger::in_memory(),
        SessionCookie::new("ledger_sid", std::time::Duration::from_secs(60)),
    );
    let app = create_router_with_state(state);

    let response = post_transaction(
        &app,
        None,
        json!({ "title": "Tip", "amount": 2, "type": "credit" }),
    )
    .await;

    let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("ledger_sid="));
    assert!(cookie.contains("Max-Age=60"));
}

// ============================================================================
// Ledger behaviour
// ============================================================================

#[tokio::test]
async fn test_summary_scenario() {
    let app = create_router();

    let (_, json) = get_json(&app, "/transactions/summary", "s1").await;
    assert_eq!(json["summary"]["amount"], 0.0);

    post_transaction(
        &app,
        Some("s1"),
        json!({ "title": "Salary", "amount": 5000, "type": "credit" }),
    )
    .await;
    post_transaction(
        &app,
        Some("s1"),
        json!({ "title": "Rent", "amount": 1200, "type": "debit" }),
    )
    .await;

    let (status, json) = get_json(&app, "/transactions/summary", "s1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"]["amount"], 3800.0);

    let (_, json) = get_json(&app, "/transactions", "s1").await;
    let titles: Vec<&str> = json["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Salary", "Rent"]);
}

#[tokio::test]
async fn test_get_one_scoped_to_session() {
    let app = create_router();

    post_transaction(
        &app,
        Some("owner"),
        json!({ "title": "Private", "amount": 99, "type": "credit" }),
    )
    .await;

    let (_, json) = get_json(&app, "/transactions", "owner").await;
    let id = json["transactions"][0]["id"].as_str().unwrap().to_string();

    let (status, json) = get_json(&app, &format!("/transactions/{}", id), "owner").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["transaction"]["id"], id.as_str());
    assert_eq!(json["transaction"]["amount"], 99.0);

    // Someone else's id and an unknown id look the same
    let (status, foreign) = get_json(&app, &format!("/transactions/{}", id), "intruder").await;
    assert_eq!(status, StatusCode::OK);
    let (_, missing) = get_json(
        &app,
        "/transactions/6f9619ff-8b86-4011-b42d-00c04fc964ff",
        "intruder",
    )
    .await;
    assert_eq!(foreign, json!({}));
    assert_eq!(foreign, missing);
}

#[tokio::test]
async fn test_trailing_slash_collection_path() {
    let app = create_router();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/transactions/",
            Some("s1"),
            Some(json!({ "title": "Refund", "amount": 15, "type": "credit" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let (status, slashed) = get_json(&app, "/transactions/", "s1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, bare) = get_json(&app, "/transactions", "s1").await;
    assert_eq!(slashed, bare);
    assert_eq!(slashed["transactions"].as_array().unwrap().len(), 1);

    let response = app
        .oneshot(json_request(Method::GET, "/transactions/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_overflowing_summary_is_internal_error() {
    let app = create_router();

    for title in ["big", "bigger"] {
        let response = post_transaction(
            &app,
            Some("huge"),
            json!({ "title": title, "amount": 1.7e308, "type": "credit" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let (status, json) = get_json(&app, "/transactions/summary", "huge").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_get_one_rejects_malformed_id() {
    let app = create_router();

    let (status, json) = get_json(&app, "/transactions/not-a-uuid", "s1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_body_inserts_nothing() {
    let app = create_router();

    let bodies = [
        json!({ "title": "Bad", "amount": "100", "type": "credit" }),
        json!({ "title": "Bad", "amount": 100, "type": "refund" }),
        json!({ "amount": 100, "type": "credit" }),
        json!({ "title": "", "amount": 100, "type": "credit" }),
        json!({ "title": "Bad", "amount": -5, "type": "debit" }),
    ];

    for body in bodies {
        let response = post_transaction(&app, Some("s1"), body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let json = response_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    let (_, json) = get_json(&app, "/transactions", "s1").await;
    assert!(json["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_json_is_validation_error() {
    let app = create_router();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/transactions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_sqlite_backed_router() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteLedger::open(dir.path().join("ledger.db")).unwrap();
    let state = AppState::with_ledger(Ledger::new(Arc::new(store)), SessionCookie::default());
    let app = create_router_with_state(state);

    let response = post_transaction(
        &app,
        None,
        json!({ "title": "Deposit", "amount": 250.5, "type": "credit" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let token = session_from(&response).unwrap();

    post_transaction(
        &app,
        Some(token.as_str()),
        json!({ "title": "Fee", "amount": 0.5, "type": "debit" }),
    )
    .await;

    let (_, json) = get_json(&app, "/transactions/summary", &token).await;
    assert_eq!(json["summary"]["amount"], 250.0);
}
