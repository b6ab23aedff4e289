#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use leadgen_api::config::ServerConfig;
use leadgen_api::router::build_app_router;
use leadgen_api::state::AppState;
use leadgen_comfyui::generator::ImageGenerator;
use leadgen_comfyui::lead_images::ImageSetMode;
use leadgen_comfyui::poller::PollConfig;
use leadgen_comfyui::testing::FakeQueue;
use leadgen_pipeline::memory_store::MemoryPageSink;
use leadgen_pipeline::pipeline::LeadPagePipeline;
use leadgen_pipeline::testing::{FakeTextGenerator, SAMPLE_CONTENT_JSON};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
    }
}

/// Handles to the fakes behind a test app.
pub struct TestApp {
    pub router: Router,
    pub queue: Arc<FakeQueue>,
    pub text: Arc<FakeTextGenerator>,
    pub store: Arc<MemoryPageSink>,
}

/// Build the full application router against scripted upstream services.
///
/// Polling runs every 10ms so a full page generates in well under a second.
pub fn build_app_with(text: FakeTextGenerator, queue: FakeQueue) -> TestApp {
    let config = test_config();
    let text = Arc::new(text);
    let queue = Arc::new(queue);
    let store = Arc::new(MemoryPageSink::new());

    let images = ImageGenerator::new(
        queue.clone(),
        PollConfig::fixed(Duration::from_millis(10), Duration::from_secs(1)),
    );
    let pipeline = LeadPagePipeline::new(
        text.clone(),
        images,
        ImageSetMode::Sequential,
        store.clone(),
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        pipeline,
        store: store.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        queue,
        text,
        store,
    }
}

/// Test app whose upstream services all succeed.
pub fn build_test_app() -> TestApp {
    build_app_with(
        FakeTextGenerator::new(SAMPLE_CONTENT_JSON),
        FakeQueue::new().with_pending_polls(1),
    )
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
