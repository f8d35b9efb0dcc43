//! X-Detect Core
//!
//! Scores summarized network flows with a pre-trained binary classifier and
//! maps the probability to a threat tier.
//!
//! ```no_run
//! use xdetect_core::{DetectorConfig, FlowRecord, PredictionPipeline};
//!
//! let pipeline = PredictionPipeline::from_config(&DetectorConfig::default())?;
//! let result = pipeline.predict(&FlowRecord::new("192.168.1.10", "8.8.8.8", "TCP", 10.0, 500))?;
//! println!("{} ({:.4})", result.threat_level, result.probability);
//! # Ok::<(), xdetect_core::DetectError>(())
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{DetectError, DetectResult};
pub use logic::audit::{AuditEntry, AuditLog, AuditSink};
pub use logic::config::{CodecMode, DetectorConfig};
pub use logic::features::{FeatureBuilder, FeatureVector, FlowRecord, LayoutInfo};
pub use logic::model::{Classifier, Normalizer, ThreatLevel, ThreatScorer, ThreatThresholds};
pub use logic::pipeline::{EngineStatus, PredictionPipeline, ScoreResult};
