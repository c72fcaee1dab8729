//! Integration tests for script versions.

mod common;

use adforge_core::generation::GenerationRequest;
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_angle, create_product_with_angles, create_selected_angle,
    get, post, post_json, put_json,
};
use serde_json::json;

#[tokio::test]
async fn version_chain_through_the_api() {
    let app = build_test_app();
    let angle_id = create_selected_angle(&app).await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/angles/{angle_id}/scripts"),
        json!({ "duration_minutes": 2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let v1 = body_json(response).await["data"].clone();
    assert_eq!(v1["version"], 1);
    assert!(v1["feedback"].is_null());
    assert!(v1["content"].is_null());

    let v1_id = v1["id"].as_i64().unwrap();
    let response = post_json(
        app.app(),
        &format!("/api/v1/scripts/{v1_id}/regenerate"),
        json!({ "feedback": "more urgency" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let v2 = body_json(response).await["data"].clone();
    assert_eq!(v2["version"], 2);
    assert_eq!(v2["feedback"], "more urgency");

    let listed = body_json(get(app.app(), &format!("/api/v1/angles/{angle_id}/scripts")).await).await;
    let versions: Vec<i64> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["version"].as_i64().unwrap())
        .collect();
    assert_eq!(versions, vec![2, 1]);

    let requests = app.trigger.requests();
    assert_eq!(
        requests.last(),
        Some(&GenerationRequest::FeedbackIteration {
            script_id: v1_id,
            new_script_id: v2["id"].as_i64().unwrap(),
            feedback: "more urgency".to_string(),
        })
    );
}

#[tokio::test]
async fn duration_defaults_when_omitted() {
    let app = build_test_app();
    let angle_id = create_selected_angle(&app).await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/angles/{angle_id}/scripts"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["duration_minutes"], 2);
}

#[tokio::test]
async fn blank_feedback_is_rejected_without_new_version() {
    let app = build_test_app();
    let angle_id = create_selected_angle(&app).await;
    let v1 = body_json(
        post_json(
            app.app(),
            &format!("/api/v1/angles/{angle_id}/scripts"),
            json!({ "duration_minutes": 2 }),
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();

    let response = post_json(
        app.app(),
        &format!("/api/v1/scripts/{v1}/regenerate"),
        json!({ "feedback": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let listed = body_json(get(app.app(), &format!("/api/v1/angles/{angle_id}/scripts")).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unselected_angle_cannot_generate() {
    let app = build_test_app();
    let product_id = create_product_with_angles(&app).await;
    let angle_id = create_angle(&app, product_id, "Unpicked").await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/angles/{angle_id}/scripts"),
        json!({ "duration_minutes": 2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn second_initial_generation_conflicts() {
    let app = build_test_app();
    let angle_id = create_selected_angle(&app).await;
    let uri = format!("/api/v1/angles/{angle_id}/scripts");

    post_json(app.app(), &uri, json!({ "duration_minutes": 2 })).await;
    let response = post_json(app.app(), &uri, json!({ "duration_minutes": 2 })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn content_delivery_and_winner() {
    let app = build_test_app();
    let angle_id = create_selected_angle(&app).await;
    let v1 = body_json(
        post_json(
            app.app(),
            &format!("/api/v1/angles/{angle_id}/scripts"),
            json!({ "duration_minutes": 3 }),
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();

    let response = put_json(
        app.app(),
        &format!("/api/v1/scripts/{v1}/content"),
        json!({ "content": "Dinner at 9pm again?" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["content"], "Dinner at 9pm again?");

    let again = put_json(
        app.app(),
        &format!("/api/v1/scripts/{v1}/content"),
        json!({ "content": "Replacement" }),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let response = put_json(
        app.app(),
        &format!("/api/v1/scripts/{v1}/winner"),
        json!({ "is_winner": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_winner"], true);
}

#[tokio::test]
async fn failed_script_dispatch_is_502_and_leaves_no_version() {
    let app = build_test_app();
    let angle_id = create_selected_angle(&app).await;
    app.trigger.set_failing(true);

    let response = post_json(
        app.app(),
        &format!("/api/v1/angles/{angle_id}/scripts"),
        json!({ "duration_minutes": 2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let listed = body_json(get(app.app(), &format!("/api/v1/angles/{angle_id}/scripts")).await).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_script_is_404() {
    let app = build_test_app();
    let response = get(app.app(), "/api/v1/scripts/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn script_listing_degrades_to_empty_when_store_is_down() {
    let app = build_test_app();
    let angle_id = create_selected_angle(&app).await;
    post_json(
        app.app(),
        &format!("/api/v1/angles/{angle_id}/scripts"),
        json!({}),
    )
    .await;

    app.store.set_unavailable(true);
    let response = get(app.app(), &format!("/api/v1/angles/{angle_id}/scripts")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[tokio::test]
async fn regenerating_a_deselected_angle_is_rejected() {
    let app = build_test_app();
    let angle_id = create_selected_angle(&app).await;
    let v1 = body_json(
        post_json(
            app.app(),
            &format!("/api/v1/angles/{angle_id}/scripts"),
            json!({}),
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();

    post(app.app(), &format!("/api/v1/angles/{angle_id}/toggle-selection")).await;
    let response = post_json(
        app.app(),
        &format!("/api/v1/scripts/{v1}/regenerate"),
        json!({ "feedback": "more urgency" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
