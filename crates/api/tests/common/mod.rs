#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use adforge_api::config::ServerConfig;
use adforge_api::router::build_app_router;
use adforge_api::state::AppState;
use adforge_core::generation::GenerationRequest;
use adforge_db::MemoryStore;
use adforge_pipeline::{GenerationTrigger, TriggerError};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        generation_webhook_url: None,
        generation_webhook_timeout_secs: 10,
        completion_poll_initial_ms: 10,
        completion_poll_max_ms: 50,
        completion_wait_max_secs: 2,
    }
}

/// Records generation requests instead of calling out.
#[derive(Default)]
pub struct RecordingTrigger {
    requests: Mutex<Vec<GenerationRequest>>,
    failing: AtomicBool,
}

impl RecordingTrigger {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationTrigger for RecordingTrigger {
    async fn fire(&self, request: &GenerationRequest) -> Result<(), TriggerError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.failing.load(Ordering::SeqCst) {
            Err(TriggerError::HttpStatus(503))
        } else {
            Ok(())
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub trigger: Arc<RecordingTrigger>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over an in-memory store and a recording trigger.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let trigger = Arc::new(RecordingTrigger::default());
    let state = AppState::new(store.clone(), trigger.clone(), test_config());
    TestApp {
        router: build_app_router(state),
        store,
        trigger,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

/// POST with no body.
pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures (created through the API)
// ---------------------------------------------------------------------------

pub async fn create_project(app: &TestApp) -> i64 {
    let response = post_json(
        app.app(),
        "/api/v1/projects",
        json!({ "name": "Spring launch" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

pub async fn create_product(app: &TestApp) -> i64 {
    let project_id = create_project(app).await;
    let response = post_json(
        app.app(),
        &format!("/api/v1/projects/{project_id}/products"),
        json!({ "name": "Meal kit", "notes": "Family boxes" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

pub async fn report_status(app: &TestApp, product_id: i64, status: &str) -> Response<Body> {
    put_json(
        app.app(),
        &format!("/api/v1/products/{product_id}/status"),
        json!({ "status": status }),
    )
    .await
}

/// Walk a fresh product through both generation steps.
pub async fn create_product_with_angles(app: &TestApp) -> i64 {
    let id = create_product(app).await;
    let details = post(app.app(), &format!("/api/v1/products/{id}/generate-details")).await;
    assert_eq!(details.status(), StatusCode::ACCEPTED);
    let reported = report_status(app, id, "details_generated").await;
    assert_eq!(reported.status(), StatusCode::OK);
    let angles = post(app.app(), &format!("/api/v1/products/{id}/generate-angles")).await;
    assert_eq!(angles.status(), StatusCode::ACCEPTED);
    id
}

pub fn angle_body(title: &str) -> Value {
    json!({
        "title": title,
        "summary": "Busy parents want meals without planning",
        "video_idea": "Parent rushing through a weeknight",
        "vsl_structure": [
            { "kind": "hook", "content": "Dinner at 9pm again?" },
            { "kind": "call_to_action", "content": "Start your first box today" }
        ],
        "emotional_triggers": ["relief"],
        "cognitive_biases": ["loss aversion"],
        "direct_response_techniques": ["scarcity"]
    })
}

pub async fn create_angle(app: &TestApp, product_id: i64, title: &str) -> i64 {
    let response = post_json(
        app.app(),
        &format!("/api/v1/products/{product_id}/angles"),
        angle_body(title),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// A selected angle whose product has finished angle generation.
pub async fn create_selected_angle(app: &TestApp) -> i64 {
    let product_id = create_product_with_angles(app).await;
    let angle_id = create_angle(app, product_id, "Time-poor parents").await;
    let reported = report_status(app, product_id, "angles_generated").await;
    assert_eq!(reported.status(), StatusCode::OK);
    let response = post(app.app(), &format!("/api/v1/angles/{angle_id}/toggle-selection")).await;
    assert_eq!(response.status(), StatusCode::OK);
    angle_id
}
