//! HTTP surface tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use graphql_gateway::{build_schema, router, AppState, QueryEngine};
use memberhub_store::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let engine = QueryEngine::new(build_schema(), Arc::new(MemoryStore::new()));
    router(AppState::new(engine))
}

fn graphql_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_post_graphql_query() {
    let response = app()
        .oneshot(graphql_request(json!({ "query": "{ memberTypes { id } }" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({ "data": { "memberTypes": [{ "id": "basic" }, { "id": "business" }] } })
    );
}

#[tokio::test]
async fn test_post_with_variables() {
    let app = app();

    let created = app
        .clone()
        .oneshot(graphql_request(json!({
            "query": "mutation($dto: CreateUserInput!) { createUser(dto: $dto) { id } }",
            "variables": { "dto": { "name": "Ann", "balance": 10 } }
        })))
        .await
        .unwrap();
    let created = body_json(created).await;
    let id = created["data"]["createUser"]["id"].clone();

    let fetched = app
        .oneshot(graphql_request(json!({
            "query": "query($id: UUID!) { user(id: $id) { name } }",
            "variables": { "id": id }
        })))
        .await
        .unwrap();
    assert_eq!(
        body_json(fetched).await,
        json!({ "data": { "user": { "name": "Ann" } } })
    );
}

#[tokio::test]
async fn test_unknown_body_property_is_rejected() {
    let response = app()
        .oneshot(graphql_request(json!({
            "query": "{ users { id } }",
            "operationName": "Users"
        })))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_missing_query_is_rejected() {
    let response = app()
        .oneshot(graphql_request(json!({ "variables": {} })))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = app();

    let health = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let health = body_json(health).await;
    assert_eq!(health["healthy"], true);
    assert_eq!(health["service_id"], "graphql-gateway");

    let ready = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(body_json(ready).await["ready"], true);
}

#[tokio::test]
async fn test_metrics_count_rejections() {
    let app = app();

    app.clone()
        .oneshot(graphql_request(json!({ "query": "{ users { id " })))
        .await
        .unwrap();

    let metrics = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let metrics = body_json(metrics).await;
    assert_eq!(metrics["requests_total"], 1);
    assert_eq!(metrics["rejected_total"], 1);
}

#[tokio::test]
async fn test_schema_export() {
    let response = app()
        .oneshot(Request::get("/schema.graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let sdl = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(sdl.contains("scalar UUID"));
    assert!(sdl.contains("type Member"));
}
