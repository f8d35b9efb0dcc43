use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::config::CodecMode;
use crate::logic::features::LayoutInfo;
use crate::logic::model::ThreatThresholds;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub version: String,
    pub layout: LayoutInfo,
    pub model: ModelStatus,
    pub stats: PredictionStats,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub engine: String,
    pub input_width: usize,
    pub thresholds: ThreatThresholds,
    pub decision_threshold: f64,
    pub codec_mode: CodecMode,
    pub audit_log: Option<String>,
    pub audit_log_open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub predictions: u64,
    pub failures: u64,
    pub malicious: u64,
    pub audit_failures: u64,
    pub avg_latency_us: f64,
}

/// Lock-free counters updated on every request
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    predictions: AtomicU64,
    failures: AtomicU64,
    malicious: AtomicU64,
    audit_failures: AtomicU64,
    latency_us_total: AtomicU64,
}

impl StatCounters {
    pub fn record_success(&self, malicious: bool, elapsed: Duration) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        if malicious {
            self.malicious.fetch_add(1, Ordering::Relaxed);
        }
        self.latency_us_total
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_audit_failure(&self) {
        self.audit_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PredictionStats {
        let predictions = self.predictions.load(Ordering::Relaxed);
        let latency = self.latency_us_total.load(Ordering::Relaxed);

        PredictionStats {
            predictions,
            failures: self.failures.load(Ordering::Relaxed),
            malicious: self.malicious.load(Ordering::Relaxed),
            audit_failures: self.audit_failures.load(Ordering::Relaxed),
            avg_latency_us: if predictions == 0 {
                0.0
            } else {
                latency as f64 / predictions as f64
            },
        }
    }
}
