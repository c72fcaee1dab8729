//! Integration tests for angle intake and selection.

mod common;

use axum::http::StatusCode;
use common::{
    angle_body, body_json, build_test_app, create_angle, create_product,
    create_product_with_angles, get, post, post_json,
};

fn ids(json: &serde_json::Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn typed_angle_round_trips() {
    let app = build_test_app();
    let product_id = create_product_with_angles(&app).await;
    let angle_id = create_angle(&app, product_id, "Time-poor parents").await;

    let json = body_json(get(app.app(), &format!("/api/v1/angles/{angle_id}")).await).await;
    assert_eq!(json["data"]["title"], "Time-poor parents");
    assert_eq!(json["data"]["is_selected"], false);
    assert_eq!(json["data"]["vsl_structure"][1]["kind"], "call_to_action");
}

#[tokio::test]
async fn invalid_angle_content_is_rejected() {
    let app = build_test_app();
    let product_id = create_product_with_angles(&app).await;

    let mut body = angle_body("Dup sections");
    body["vsl_structure"][1]["kind"] = "hook".into();
    let response = post_json(
        app.app(),
        &format!("/api/v1/products/{product_id}/angles"),
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn angles_need_angle_generation_to_have_started() {
    let app = build_test_app();
    let product_id = create_product(&app).await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/products/{product_id}/angles"),
        angle_body("Too early"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggle_twice_restores_selection() {
    let app = build_test_app();
    let product_id = create_product_with_angles(&app).await;
    let angle_id = create_angle(&app, product_id, "Toggle me").await;
    let uri = format!("/api/v1/angles/{angle_id}/toggle-selection");

    let first = body_json(post(app.app(), &uri).await).await;
    assert_eq!(first["data"]["is_selected"], true);
    let second = body_json(post(app.app(), &uri).await).await;
    assert_eq!(second["data"]["is_selected"], false);
}

#[tokio::test]
async fn toggle_missing_angle_is_404() {
    let app = build_test_app();
    let response = post(app.app(), "/api/v1/angles/31337/toggle-selection").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_filters_by_selection_newest_first() {
    let app = build_test_app();
    let product_id = create_product_with_angles(&app).await;
    let a = create_angle(&app, product_id, "A").await;
    let b = create_angle(&app, product_id, "B").await;
    post(app.app(), &format!("/api/v1/angles/{a}/toggle-selection")).await;

    let base = format!("/api/v1/products/{product_id}/angles");
    let all = body_json(get(app.app(), &base).await).await;
    assert_eq!(ids(&all), vec![b, a]);

    let selected = body_json(get(app.app(), &format!("{base}?filter=selected")).await).await;
    assert_eq!(ids(&selected), vec![a]);

    let unselected = body_json(get(app.app(), &format!("{base}?filter=unselected")).await).await;
    assert_eq!(ids(&unselected), vec![b]);
}

#[tokio::test]
async fn unknown_filter_is_bad_request() {
    let app = build_test_app();
    let product_id = create_product_with_angles(&app).await;

    let response = get(
        app.app(),
        &format!("/api/v1/products/{product_id}/angles?filter=maybe"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn angle_listing_degrades_to_empty_when_store_is_down() {
    let app = build_test_app();
    let product_id = create_product_with_angles(&app).await;
    create_angle(&app, product_id, "A").await;

    app.store.set_unavailable(true);
    let response = get(app.app(), &format!("/api/v1/products/{product_id}/angles")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[tokio::test]
async fn angle_listing_of_missing_product_is_not_found() {
    let app = build_test_app();
    let response = get(app.app(), "/api/v1/products/4242/angles").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
