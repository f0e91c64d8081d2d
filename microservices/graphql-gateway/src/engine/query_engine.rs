//! GraphQL request entry point
//!
//! Parses and validates each document (including the depth rule) before
//! anything touches the store. Rejected documents come back as an
//! `errors`-only reply.

use std::time::Instant;

use async_graphql::{
    EmptySubscription, Name, PathSegment, Request, Response, Schema, ServerError, Value, Variables,
};
use memberhub_store::StoreHandle;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::metrics::GatewayMetrics;
use crate::schema::{MutationRoot, QueryRoot};

/// Maximum nesting below the top-level fields of one document.
///
/// Top-level fields sit at depth 0, so `{ users { id } }` has depth 1.
pub const MAX_QUERY_DEPTH: usize = 5;

pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema. Pure; call once at startup and share the result.
pub fn build_schema() -> GatewaySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        // async-graphql counts top-level fields as depth 1
        .limit_depth(MAX_QUERY_DEPTH + 1)
        .finish()
}

/// `POST /` body
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphQlBody {
    pub query: String,
    #[serde(default)]
    pub variables: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GraphQlBody {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = variables {
            self.variables = Some(map);
        }
        self
    }
}

/// Standard GraphQL response envelope
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ServerError>,
}

impl GraphQlReply {
    /// True when the document never reached execution
    pub fn is_rejected(&self) -> bool {
        self.data.is_none()
    }
}

impl From<Response> for GraphQlReply {
    fn from(response: Response) -> Self {
        // Parse and validation errors carry no field path and produce no data.
        let rejected = matches!(response.data, Value::Null)
            && !response.errors.is_empty()
            && response.errors.iter().all(|e| e.path.is_empty());

        if rejected {
            return Self {
                data: None,
                errors: response.errors,
            };
        }

        let mut data = response.data;
        for error in &response.errors {
            null_failed_field(&mut data, &error.path);
        }

        Self {
            data: Some(data),
            errors: response.errors,
        }
    }
}

/// Write `null` for the field a path-carrying error removed from `data`.
///
/// The executor drops a failed field from its parent object (and an empty
/// root becomes `null`), so the first missing key along the path is the field
/// that failed.
fn null_failed_field(data: &mut Value, path: &[PathSegment]) {
    if path.is_empty() {
        return;
    }
    if matches!(data, Value::Null) {
        *data = Value::Object(Default::default());
    }

    let mut current = data;
    for segment in path {
        let next = match (segment, current) {
            (PathSegment::Field(key), Value::Object(fields)) => {
                let key = Name::new(key);
                if !fields.contains_key(&key) {
                    fields.insert(key, Value::Null);
                    return;
                }
                fields.get_mut(&key)
            }
            (PathSegment::Index(idx), Value::List(items)) => items.get_mut(*idx),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return,
        }
    }
}

/// Executes documents against the shared schema with the store bound per request
#[derive(Clone)]
pub struct QueryEngine {
    schema: GatewaySchema,
    store: StoreHandle,
    metrics: GatewayMetrics,
}

impl QueryEngine {
    pub fn new(schema: GatewaySchema, store: StoreHandle) -> Self {
        Self {
            schema,
            store,
            metrics: GatewayMetrics::new(),
        }
    }

    pub fn schema(&self) -> &GatewaySchema {
        &self.schema
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    pub async fn execute(&self, body: GraphQlBody) -> GraphQlReply {
        let started = Instant::now();
        self.metrics.requests.inc();

        let mut request = Request::new(body.query);
        if let Some(variables) = body.variables {
            request = request.variables(Variables::from_json(serde_json::Value::Object(variables)));
        }
        let request = request.data(self.store.clone());

        let reply = GraphQlReply::from(self.schema.execute(request).await);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.metrics.latency_ms.record(elapsed_ms);

        if reply.is_rejected() {
            self.metrics.rejected.inc();
            warn!(
                errors = reply.errors.len(),
                first_error = reply.errors.first().map(|e| e.message.as_str()).unwrap_or(""),
                "GraphQL document rejected"
            );
        } else if !reply.errors.is_empty() {
            self.metrics.field_errors.add(reply.errors.len() as u64);
            debug!(errors = reply.errors.len(), elapsed_ms, "GraphQL request finished with field errors");
        } else {
            debug!(elapsed_ms, "GraphQL request finished");
        }

        reply
    }
}
