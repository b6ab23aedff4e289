//! Integration tests for the `/api/v1/lead-pages` and `/api/v1/media`
//! endpoints, driven against scripted upstream services.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, build_app_with, build_test_app, get, post_json};
use leadgen_comfyui::testing::FakeQueue;
use leadgen_pipeline::testing::{FakeTextGenerator, SAMPLE_CONTENT_JSON};
use serde_json::json;

const PROMPT: &str = "Build a page to sell pallet storage. We help with same-day fulfillment.";

// ---------------------------------------------------------------------------
// Test: POST /lead-pages generates, stores and links a full page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_lead_page_returns_201_with_ids() {
    let app = build_test_app();

    let response = post_json(
        app.router.clone(),
        "/api/v1/lead-pages",
        json!({ "prompt": PROMPT }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["slug"], "fast-freight-fulfillment");
    assert_eq!(data["page_url"], "/lead-gen/fast-freight-fulfillment");
    assert_eq!(data["message"], "Lead generation page created successfully");
    assert!(data["page_id"].is_string());

    // One hero and two feature jobs were run.
    assert_eq!(app.queue.submission_count(), 3);
    assert_eq!(app.store.media_count().await, 3);
    assert!(app.text.prompts()[0].contains("pallet storage business"));
}

// ---------------------------------------------------------------------------
// Test: Created page and its images can be read back
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_page_and_media_are_served() {
    let app = build_test_app();

    let created = body_json(
        post_json(
            app.router.clone(),
            "/api/v1/lead-pages",
            json!({ "prompt": PROMPT }),
        )
        .await,
    )
    .await;
    let page_id = created["data"]["page_id"].as_str().unwrap();

    let response = get(app.router.clone(), &format!("/api/v1/lead-pages/{page_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_json(response).await["data"].clone();
    assert_eq!(page["id"], page_id);
    assert_eq!(page["generatedBy"], "AI Agent");
    assert_eq!(page["aiPrompt"], PROMPT);
    assert_eq!(page["leadForm"]["fields"].as_array().unwrap().len(), 4);
    assert_eq!(page["leadForm"]["fields"][1]["type"], "email");

    let hero_id = page["heroSection"]["image"].as_str().unwrap();
    let response = get(app.router.clone(), &format!("/api/v1/media/{hero_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/png"
    );
    assert_eq!(
        body_bytes(response).await,
        FakeQueue::artifact_bytes("generated_job-1_.png")
    );

    let feature_id = page["featuresSection"]["features"][0]["image"]
        .as_str()
        .unwrap();
    let response = get(app.router, &format!("/api/v1/media/{feature_id}")).await;
    assert_eq!(
        body_bytes(response).await,
        FakeQueue::artifact_bytes("generated_job-2_.png")
    );
}

// ---------------------------------------------------------------------------
// Test: Empty and missing prompts are rejected with 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_prompt_returns_400() {
    let app = build_test_app();

    let response = post_json(
        app.router.clone(),
        "/api/v1/lead-pages",
        json!({ "prompt": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Prompt is required");

    let response = post_json(app.router, "/api/v1/lead-pages", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.queue.submission_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: Unreachable upstream service returns 503 before any generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn offline_text_service_returns_503() {
    let app = build_app_with(
        FakeTextGenerator::new(SAMPLE_CONTENT_JSON).offline(),
        FakeQueue::new(),
    );

    let response = post_json(
        app.router.clone(),
        "/api/v1/lead-pages",
        json!({ "prompt": PROMPT }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("text generation (Ollama)"));
    assert!(app.text.prompts().is_empty());
    assert_eq!(app.queue.submission_count(), 0);
}

#[tokio::test]
async fn offline_image_queue_returns_503() {
    let app = build_app_with(
        FakeTextGenerator::new(SAMPLE_CONTENT_JSON),
        FakeQueue::new().offline(),
    );

    let response = post_json(app.router, "/api/v1/lead-pages", json!({ "prompt": PROMPT })).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("image generation (ComfyUI)"));
}

// ---------------------------------------------------------------------------
// Test: A job that never completes surfaces as a 500 naming the image
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_timeout_returns_500_with_stage_message() {
    let app = build_app_with(
        FakeTextGenerator::new(SAMPLE_CONTENT_JSON),
        FakeQueue::new().never_complete(),
    );

    let response = post_json(
        app.router.clone(),
        "/api/v1/lead-pages",
        json!({ "prompt": PROMPT }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "GENERATION_FAILED");
    let message = json["error"].as_str().unwrap();
    assert!(
        message.starts_with("Failed to generate lead page: Failed to generate lead gen images"),
        "{message}"
    );
    assert!(message.contains("hero image"), "{message}");
    assert!(message.contains("timed out"), "{message}");

    // Nothing was published for the failed run.
    assert_eq!(app.store.page_count().await, 0);
    assert_eq!(app.queue.fetch_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: Text without a JSON object surfaces as a 500
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unparseable_content_returns_500() {
    let app = build_app_with(
        FakeTextGenerator::new("Sorry, I can't do that."),
        FakeQueue::new(),
    );

    let response = post_json(
        app.router.clone(),
        "/api/v1/lead-pages",
        json!({ "prompt": PROMPT }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Could not extract JSON from the response"));
    assert_eq!(app.queue.submission_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: Generating the same title twice returns 409
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_slug_returns_409() {
    let app = build_test_app();

    let first = post_json(
        app.router.clone(),
        "/api/v1/lead-pages",
        json!({ "prompt": PROMPT }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app.router, "/api/v1/lead-pages", json!({ "prompt": PROMPT })).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");

    // The second run stops before generating or uploading any image.
    assert_eq!(app.queue.submission_count(), 3);
    assert_eq!(app.store.media_count().await, 3);
}

// ---------------------------------------------------------------------------
// Test: Unknown ids return 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_page_returns_404() {
    let app = build_test_app();
    let response = get(app.router, "/api/v1/lead-pages/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "LeadGenPage with id does-not-exist not found");
}

#[tokio::test]
async fn unknown_media_returns_404() {
    let app = build_test_app();
    let response = get(app.router, "/api/v1/media/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
