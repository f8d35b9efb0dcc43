//! Prediction request/response models

use serde::{Deserialize, Serialize};
use validator::Validate;
use xdetect_core::{FlowRecord, ScoreResult};

/// One flow to score
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(length(min = 1, max = 64))]
    pub source_ip: String,
    #[validate(length(min = 1, max = 64))]
    pub destination_ip: String,
    #[validate(length(min = 1, max = 16))]
    pub protocol: String,
    #[validate(range(min = 0.0))]
    pub duration: f64,
    pub packet_size_total: u64,
}

impl From<PredictRequest> for FlowRecord {
    fn from(req: PredictRequest) -> Self {
        FlowRecord::new(
            req.source_ip,
            req.destination_ip,
            req.protocol,
            req.duration,
            req.packet_size_total,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchPredictRequest {
    pub records: Vec<FlowRecord>,
}

/// Per-record outcome; one bad record does not fail the batch
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Scored(ScoreResult),
    Failed { error: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictResponse {
    pub results: Vec<BatchItem>,
    pub scored: usize,
    pub failed: usize,
}
