//! HTTP surface tests: routing, owner-identity extraction, error mapping

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use millwright::api::{build_router, AppState};

use crate::memory_pool;

async fn app() -> Router {
    let pool = memory_pool().await;
    build_router(AppState { pool })
}

fn request(method: &str, uri: &str, owner: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(owner) = owner {
        builder = builder.header("x-owner-id", owner);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_owner_header_is_unauthenticated() {
    let app = app().await;

    let response = app
        .oneshot(request("GET", "/api/plants", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn register_and_list_plants() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/plants",
            Some("alice"),
            Some(json!({
                "name": "North Field",
                "address": "1 Field Road",
                "latitude": -8.0476,
                "longitude": -34.877,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["id"], 1);

    let response = app
        .oneshot(request("GET", "/api/plants", Some("alice"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["sequenceOrder"], 1);
}

#[tokio::test]
async fn plants_are_invisible_across_owners() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/plants",
            Some("alice"),
            Some(json!({
                "name": "North Field",
                "address": "1 Field Road",
                "latitude": 0.0,
                "longitude": 0.0,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(request("GET", "/api/plants/1", Some("bob"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn incomplete_visit_payload_is_invalid_argument() {
    let app = app().await;

    let response = app
        .oneshot(request("POST", "/api/visits", Some("alice"), Some(json!({}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn non_numeric_identifier_is_rejected() {
    let app = app().await;

    let response = app
        .oneshot(request("GET", "/api/plants/abc", Some("alice"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checklist_catalog_seeds_ten_defaults() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/checklist", Some("alice"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);

    let response = app
        .oneshot(request("GET", "/api/checklist", Some("bob"), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn first_visit_seeds_rotation_over_http() {
    let app = app().await;

    for name in ["North Field", "South Field"] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/plants",
                Some("alice"),
                Some(json!({
                    "name": name,
                    "address": "1 Field Road",
                    "latitude": 0.0,
                    "longitude": 0.0,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/visits",
            Some("alice"),
            Some(json!({
                "plantId": 1,
                "startDate": "2024-01-01T09:00:00Z",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The first visit ever also seeds a follow-up for the second plant
    let response = app
        .oneshot(request("GET", "/api/visits", Some("alice"), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    let visits = body["data"].as_array().unwrap();
    assert_eq!(visits.len(), 2);
    assert_eq!(visits[1]["plant"]["name"], "South Field");
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app().await;

    let response = app
        .oneshot(request("GET", "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
