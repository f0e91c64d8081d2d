//! HTTP routes

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use memberhub_core::{DependencyStatus, HealthStatus, ReadinessStatus};

use crate::engine::{GraphQlBody, GraphQlReply, QueryEngine};
use crate::metrics::MetricsSnapshot;
use crate::SERVICE_ID;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: QueryEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            start_time: Instant::now(),
        }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: SERVICE_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    pub async fn readiness(&self) -> ReadinessStatus {
        let probe = Instant::now();
        let store_up = self.engine.store().ping().await;
        ReadinessStatus {
            ready: store_up,
            dependencies: vec![DependencyStatus {
                name: "store".to_string(),
                available: store_up,
                latency_ms: Some(probe.elapsed().as_millis() as u64),
            }],
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // GraphQL endpoint
        .route("/", post(graphql_handler))
        // Health endpoints
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        // Schema export
        .route("/schema.graphql", get(sdl_handler))
        .with_state(state)
}

async fn graphql_handler(
    State(state): State<AppState>,
    Json(body): Json<GraphQlBody>,
) -> Json<GraphQlReply> {
    Json(state.engine.execute(body).await)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health())
}

async fn ready_handler(State(state): State<AppState>) -> (StatusCode, Json<ReadinessStatus>) {
    let readiness = state.readiness().await;
    let status = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(readiness))
}

async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.engine.metrics().snapshot())
}

async fn sdl_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.engine.schema().sdl(),
    )
}
