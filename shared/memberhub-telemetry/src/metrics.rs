//! Metrics primitives

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic counter
#[derive(Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
    name: String,
}

impl Counter {
    pub fn new(name: &str) -> Self {
        Self {
            value: Arc::new(AtomicU64::new(0)),
            name: name.to_string(),
        }
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Sliding-window histogram (keeps the most recent samples)
#[derive(Clone)]
pub struct Histogram {
    samples: Arc<parking_lot::Mutex<VecDeque<f64>>>,
    name: String,
    max_samples: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramSnapshot {
    pub count: usize,
    pub mean: f64,
    pub p50: f64,
    pub p99: f64,
}

impl Histogram {
    pub fn new(name: &str) -> Self {
        Self::with_capacity(name, 10_000)
    }

    pub fn with_capacity(name: &str, max_samples: usize) -> Self {
        Self {
            samples: Arc::new(parking_lot::Mutex::new(VecDeque::with_capacity(
                max_samples.min(1000),
            ))),
            name: name.to_string(),
            max_samples: max_samples.max(1),
        }
    }

    pub fn record(&self, value: f64) {
        let mut samples = self.samples.lock();
        if samples.len() >= self.max_samples {
            samples.pop_front();
        }
        samples.push_back(value);
    }

    pub fn percentile(&self, p: f64) -> f64 {
        let samples = self.samples.lock();
        percentile_of(samples.iter().copied().collect(), p)
    }

    pub fn mean(&self) -> f64 {
        let samples = self.samples.lock();
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        let values: Vec<f64> = self.samples.lock().iter().copied().collect();
        let count = values.len();
        let mean = if count == 0 {
            0.0
        } else {
            values.iter().sum::<f64>() / count as f64
        };
        HistogramSnapshot {
            count,
            mean,
            p50: percentile_of(values.clone(), 50.0),
            p99: percentile_of(values, 99.0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn percentile_of(mut values: Vec<f64>, p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let idx = ((values.len() as f64) * p / 100.0) as usize;
    values[idx.min(values.len() - 1)]
}
