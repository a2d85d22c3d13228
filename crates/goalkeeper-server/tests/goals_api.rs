//! End-to-end tests for the HTTP surface, driven through the full router
//! (access log, CORS, metrics) against in-process stores.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use goalkeeper_core::{
    error::{GoalError, Result},
    Goal, GoalId, GoalText,
};
use goalkeeper_server::{
    app_state::AppState,
    obs::AccessLog,
    router::build_router,
    store::{GoalStore, InMemoryGoalStore},
};

struct FailingStore;

#[async_trait]
impl GoalStore for FailingStore {
    fn backend(&self) -> &'static str {
        "failing"
    }
    async fn list(&self) -> Result<Vec<Goal>> {
        Err(GoalError::Store("connection refused".into()))
    }
    async fn insert(&self, _text: GoalText) -> Result<Goal> {
        Err(GoalError::Store("connection refused".into()))
    }
    async fn delete(&self, _id: &GoalId) -> Result<()> {
        Err(GoalError::Store("connection refused".into()))
    }
}

struct TestApp {
    router: Router,
    store: Arc<InMemoryGoalStore>,
    logs: TempDir,
}

async fn app_with(store: Arc<dyn GoalStore>) -> (Router, TempDir) {
    let logs = tempfile::tempdir().unwrap();
    let access_log = AccessLog::open(logs.path().join("logs").join("access.log"))
        .await
        .unwrap();
    (build_router(AppState::new(store, access_log)), logs)
}

async fn app() -> TestApp {
    let store = Arc::new(InMemoryGoalStore::new());
    let (router, logs) = app_with(store.clone()).await;
    TestApp { router, store, logs }
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Reply {
    fn json(&self) -> Value {
        match serde_json::from_str(&self.body) {
            Ok(v) => v,
            Err(e) => panic!("response body is not JSON: {e}; body={}", self.body),
        }
    }
}

async fn send(router: &Router, req: Request<Body>) -> Reply {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    Reply {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

async fn get(router: &Router, uri: &str) -> Reply {
    let req = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
    send(router, req).await
}

async fn post_json(router: &Router, body: Value) -> Reply {
    let req = Request::builder()
        .method("POST")
        .uri("/goals")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, req).await
}

async fn delete(router: &Router, id: &str) -> Reply {
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/goals/{id}"))
        .body(Body::empty())
        .unwrap();
    send(router, req).await
}

#[tokio::test]
async fn empty_store_lists_no_goals() {
    let app = app().await;
    let reply = get(&app.router, "/goals").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({ "goals": [] }));
}

#[tokio::test]
async fn blank_text_is_rejected_without_writing() {
    let app = app().await;
    let reply = post_json(&app.router, json!({ "text": "  " })).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.json(), json!({ "message": "Invalid goal text." }));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn missing_or_non_string_text_is_rejected() {
    let app = app().await;
    for body in [json!({}), json!({ "text": 5 }), json!({ "text": null })] {
        let reply = post_json(&app.router, body).await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    let req = Request::builder()
        .method("POST")
        .uri("/goals")
        .body(Body::from("text=Run"))
        .unwrap();
    let reply = send(&app.router, req).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn created_goal_is_listed() {
    let app = app().await;
    let reply = post_json(&app.router, json!({ "text": "Run 5k" })).await;
    assert_eq!(reply.status, StatusCode::CREATED);

    let body = reply.json();
    assert_eq!(body["message"], "Goal saved");
    assert_eq!(body["goal"]["text"], "Run 5k");
    let id = body["goal"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let listed = get(&app.router, "/goals").await.json();
    assert_eq!(listed, json!({ "goals": [{ "id": id, "text": "Run 5k" }] }));
}

#[tokio::test]
async fn created_text_is_trimmed() {
    let app = app().await;
    let body = post_json(&app.router, json!({ "text": "  Read a book \n" })).await.json();
    assert_eq!(body["goal"]["text"], "Read a book");
}

#[tokio::test]
async fn delete_removes_goal() {
    let app = app().await;
    let first = post_json(&app.router, json!({ "text": "Run 5k" })).await.json();
    post_json(&app.router, json!({ "text": "Learn Rust" })).await;
    let id = first["goal"]["id"].as_str().unwrap();

    let reply = delete(&app.router, id).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({ "message": "Deleted goal!" }));

    let listed = get(&app.router, "/goals").await.json();
    let goals = listed["goals"].as_array().unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["text"], "Learn Rust");
}

#[tokio::test]
async fn delete_unknown_id_still_succeeds() {
    let app = app().await;
    post_json(&app.router, json!({ "text": "Run 5k" })).await;

    let reply = delete(&app.router, "ffffffffffffffffffffffff").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({ "message": "Deleted goal!" }));
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn delete_malformed_id_is_a_store_error() {
    let app = app().await;
    post_json(&app.router, json!({ "text": "Run 5k" })).await;

    let reply = delete(&app.router, "not-an-object-id").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json(), json!({ "message": "Failed to delete goal." }));
    assert!(!reply.body.contains("ObjectId"));
    assert_eq!(app.store.len().await, 1);

    let metrics = get(&app.router, "/metrics").await.body;
    assert!(metrics.contains(r#"goalkeeper_store_errors_total{op="delete"} 1"#));
    assert!(metrics.contains(
        r#"goalkeeper_http_requests_total{method="DELETE",route="/goals/:id",status_code="500"} 1"#
    ));
}

#[tokio::test]
async fn store_failures_map_to_generic_500() {
    let (router, _logs) = app_with(Arc::new(FailingStore)).await;

    let reply = get(&router, "/goals").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json(), json!({ "message": "Failed to load goals." }));

    let reply = post_json(&router, json!({ "text": "Run 5k" })).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json(), json!({ "message": "Failed to save goal." }));

    let reply = delete(&router, "ffffffffffffffffffffffff").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json(), json!({ "message": "Failed to delete goal." }));
    assert!(!reply.body.contains("connection refused"));

    let metrics = get(&router, "/metrics").await.body;
    assert!(metrics.contains(r#"goalkeeper_store_errors_total{op="list"} 1"#));
    assert!(metrics.contains(r#"goalkeeper_store_errors_total{op="delete"} 1"#));
}

#[tokio::test]
async fn invalid_text_wins_over_store_failure() {
    let (router, _logs) = app_with(Arc::new(FailingStore)).await;
    let reply = post_json(&router, json!({ "text": "" })).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn metrics_count_prior_requests() {
    let app = app().await;
    let series = r#"goalkeeper_http_requests_total{method="GET",route="/goals",status_code="200"}"#;

    get(&app.router, "/goals").await;
    let reply = get(&app.router, "/metrics").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.headers.get(header::CONTENT_TYPE).unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );
    assert!(reply.body.contains(&format!("{series} 1")));
    assert!(reply.body.contains("process_uptime_seconds"));

    get(&app.router, "/goals").await;
    let body = get(&app.router, "/metrics").await.body;
    assert!(body.contains(&format!("{series} 2")));
    assert!(body.contains(
        r#"goalkeeper_http_request_duration_ms_count{method="GET",route="/goals",status_code="200"} 2"#
    ));
    // Scrapes are not counted.
    assert!(!body.contains(r#"route="/metrics""#));
}

#[tokio::test]
async fn metrics_use_route_template_and_status() {
    let app = app().await;
    post_json(&app.router, json!({ "text": " " })).await;
    delete(&app.router, "ffffffffffffffffffffffff").await;

    let body = get(&app.router, "/metrics").await.body;
    assert!(body.contains(
        r#"goalkeeper_http_requests_total{method="POST",route="/goals",status_code="422"} 1"#
    ));
    assert!(body.contains(
        r#"goalkeeper_http_requests_total{method="DELETE",route="/goals/:id",status_code="200"} 1"#
    ));
}

#[tokio::test]
async fn unmatched_and_health_requests_are_counted() {
    let app = app().await;
    let reply = get(&app.router, "/nope").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    get(&app.router, "/healthz").await;

    let body = get(&app.router, "/metrics").await.body;
    assert!(body.contains(
        r#"goalkeeper_http_requests_total{method="GET",route="<unmatched>",status_code="404"} 1"#
    ));
    assert!(body.contains(
        r#"goalkeeper_http_requests_total{method="GET",route="/healthz",status_code="200"} 1"#
    ));
    assert!(!body.contains(r#"route="/nope""#));
}

#[tokio::test]
async fn cors_headers_are_set() {
    let app = app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/goals")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let reply = send(&app.router, req).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let app = app().await;
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/goals")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let reply = send(&app.router, req).await;
    assert_eq!(reply.status, StatusCode::OK);

    let methods = reply
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    for m in ["GET", "POST", "DELETE", "OPTIONS"] {
        assert!(methods.contains(m), "missing {m} in {methods}");
    }
    let allowed = reply
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("content-type"));
}

#[tokio::test]
async fn every_request_appends_an_access_log_line() {
    let app = app().await;
    get(&app.router, "/goals").await;
    post_json(&app.router, json!({ "text": "" })).await;
    get(&app.router, "/healthz").await;

    let log = std::fs::read_to_string(app.logs.path().join("logs").join("access.log")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("\"GET /goals HTTP/1.1\" 200"));
    assert!(lines[1].contains("\"POST /goals HTTP/1.1\" 422"));
    assert!(lines[2].contains("\"GET /healthz HTTP/1.1\" 200 2"));
}
