//! Prediction Pipeline - FlowRecord to ScoreResult
//!
//! Validate -> build features -> normalize -> classify -> score -> audit.
//! Artifacts are loaded once and shared read-only; a single pipeline can
//! serve any number of concurrent callers.
//!
//! ## Structure
//! - `status.rs` - EngineStatus and lock-free prediction counters

pub mod status;


use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::APP_VERSION;
use crate::error::{DetectError, DetectResult};
use crate::logic::audit::{AuditEntry, AuditLog, AuditSink};
use crate::logic::config::DetectorConfig;
use crate::logic::features::{FeatureBuilder, FlowRecord, LayoutInfo, FEATURE_COUNT};
use crate::logic::model::inference::check_probability;
use crate::logic::model::{load_classifier, Classifier, Normalizer, ThreatLevel, ThreatScorer};

pub use status::{EngineStatus, ModelStatus, PredictionStats};
use status::StatCounters;

/// Outcome of one prediction, returned to the caller as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub probability: f64,
    pub prediction: bool,
    pub threat_level: ThreatLevel,
    pub description: String,
}

pub struct PredictionPipeline {
    builder: FeatureBuilder,
    normalizer: Normalizer,
    classifier: Arc<dyn Classifier>,
    scorer: ThreatScorer,
    decision_threshold: f64,
    audit: Option<Arc<dyn AuditSink>>,
    audit_log: Option<Arc<AuditLog>>,
    stats: StatCounters,
    started_at: DateTime<Utc>,
}

impl PredictionPipeline {
    /// Assemble a pipeline from already-loaded components (no auditing)
    pub fn new(
        config: &DetectorConfig,
        normalizer: Normalizer,
        classifier: Arc<dyn Classifier>,
    ) -> DetectResult<Self> {
        config.validate()?;

        if classifier.input_width() != FEATURE_COUNT {
            return Err(DetectError::DimensionMismatch {
                context: "classifier input",
                expected: FEATURE_COUNT,
                actual: classifier.input_width(),
            });
        }

        Ok(Self {
            builder: FeatureBuilder::new(config.codec_mode),
            normalizer,
            classifier,
            scorer: ThreatScorer::new(config.thresholds)?,
            decision_threshold: config.decision_threshold,
            audit: None,
            audit_log: None,
            stats: StatCounters::default(),
            started_at: Utc::now(),
        })
    }

    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Load both artifacts and open the audit log
    ///
    /// Artifact failures are fatal. An audit log that cannot be opened is
    /// reported and retried on each prediction.
    pub fn from_config(config: &DetectorConfig) -> DetectResult<Self> {
        log::info!(
            "Initializing prediction pipeline (model: {}, scaler: {})",
            config.model_path.display(),
            config.scaler_path.display()
        );

        let normalizer = Normalizer::load(&config.scaler_path, config.scaler_sha256.as_deref())?;
        let classifier = load_classifier(&config.model_path, config.model_sha256.as_deref())?;
        let mut pipeline = Self::new(config, normalizer, classifier)?;

        if let Some(path) = &config.audit_log_path {
            let log = Arc::new(AuditLog::new(path));
            pipeline.audit = Some(log.clone());
            pipeline.audit_log = Some(log);
        } else {
            log::warn!("Audit log disabled");
        }

        log::info!("Prediction pipeline ready ({})", pipeline.classifier.name());
        Ok(pipeline)
    }

    pub fn predict(&self, record: &FlowRecord) -> DetectResult<ScoreResult> {
        let start = Instant::now();

        match self.score(record) {
            Ok(result) => {
                self.stats.record_success(result.prediction, start.elapsed());
                self.audit(record, &result);
                Ok(result)
            }
            Err(e) => {
                self.stats.record_failure();
                log::warn!(
                    "Prediction failed for {} -> {}: {}",
                    record.source_ip,
                    record.destination_ip,
                    e
                );
                Err(e)
            }
        }
    }

    /// Each record is scored independently; one failure does not stop the rest
    pub fn predict_batch(&self, records: &[FlowRecord]) -> Vec<DetectResult<ScoreResult>> {
        records.iter().map(|record| self.predict(record)).collect()
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            version: APP_VERSION.to_string(),
            layout: LayoutInfo::current(),
            model: ModelStatus {
                engine: self.classifier.name().to_string(),
                input_width: self.classifier.input_width(),
                thresholds: self.scorer.thresholds(),
                decision_threshold: self.decision_threshold,
                codec_mode: self.builder.mode(),
                audit_log: self
                    .audit_log
                    .as_ref()
                    .map(|log| log.path().display().to_string()),
                audit_log_open: self.audit_log.as_ref().is_some_and(|log| log.is_open()),
            },
            stats: self.stats.snapshot(),
            started_at: self.started_at,
        }
    }

    fn score(&self, record: &FlowRecord) -> DetectResult<ScoreResult> {
        record.validate()?;

        let features = self.builder.build(record)?;
        log::trace!("Features: {}", features.to_log_entry());
        let normalized = self.normalizer.transform(&features)?;
        let probability = check_probability(self.classifier.predict_probability(&normalized)?)?;

        let prediction = probability >= self.decision_threshold;
        let (threat_level, description) = self.scorer.classify(probability);

        log::debug!(
            "Scored {} -> {} [{}]: p={:.4} level={}",
            record.source_ip,
            record.destination_ip,
            record.protocol,
            probability,
            threat_level
        );

        Ok(ScoreResult {
            probability,
            prediction,
            threat_level,
            description: description.to_string(),
        })
    }

    fn audit(&self, record: &FlowRecord, result: &ScoreResult) {
        let Some(sink) = &self.audit else {
            return;
        };

        let entry = AuditEntry::new(
            record,
            result.prediction,
            result.probability,
            result.threat_level,
            &result.description,
        );
        if let Err(e) = sink.record(&entry) {
            self.stats.record_audit_failure();
            log::error!("Failed to write audit entry: {}", e);
        }
    }
}
