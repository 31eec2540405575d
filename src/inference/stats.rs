//! Prediction counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lock-free counters updated by every prediction call
#[derive(Debug, Default)]
pub struct InferenceStats {
    total_predictions: AtomicU64,
    total_rows: AtomicU64,
    failed_predictions: AtomicU64,
    total_latency_us: AtomicU64,
    last_latency_us: AtomicU64,
}

/// Point-in-time copy of [`InferenceStats`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_predictions: u64,
    pub total_rows: u64,
    pub failed_predictions: u64,
    pub avg_latency_ms: f64,
    pub last_latency_ms: f64,
}

impl InferenceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, rows: usize, latency: Duration) {
        let us = latency.as_micros() as u64;
        self.total_predictions.fetch_add(1, Ordering::Relaxed);
        self.total_rows.fetch_add(rows as u64, Ordering::Relaxed);
        self.total_latency_us.fetch_add(us, Ordering::Relaxed);
        self.last_latency_us.store(us, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed_predictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.total_predictions.load(Ordering::Relaxed);
        let total_latency_us = self.total_latency_us.load(Ordering::Relaxed);
        StatsSnapshot {
            total_predictions: total,
            total_rows: self.total_rows.load(Ordering::Relaxed),
            failed_predictions: self.failed_predictions.load(Ordering::Relaxed),
            avg_latency_ms: if total == 0 {
                0.0
            } else {
                total_latency_us as f64 / total as f64 / 1000.0
            },
            last_latency_ms: self.last_latency_us.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}
