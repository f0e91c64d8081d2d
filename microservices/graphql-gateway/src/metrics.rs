//! Gateway request metrics

use memberhub_telemetry::{Counter, Histogram, HistogramSnapshot};
use serde::Serialize;

#[derive(Clone)]
pub struct GatewayMetrics {
    pub requests: Counter,
    pub rejected: Counter,
    pub field_errors: Counter,
    pub latency_ms: Histogram,
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub rejected_total: u64,
    pub field_errors_total: u64,
    pub execution_ms: HistogramSnapshot,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self {
            requests: Counter::new("graphql_requests_total"),
            rejected: Counter::new("graphql_rejected_documents_total"),
            field_errors: Counter::new("graphql_field_errors_total"),
            latency_ms: Histogram::new("graphql_execution_ms"),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests.get(),
            rejected_total: self.rejected.get(),
            field_errors_total: self.field_errors.get(),
            execution_ms: self.latency_ms.snapshot(),
        }
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}
