//! Model Module - Normalization, Inference and Threat Scoring
//!
//! Artifacts are loaded once, validated against the feature layout, and
//! shared read-only between requests.

pub mod artifact;
pub mod scaler;
pub mod inference;
pub mod ensemble;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod threshold;

// Re-export common types
pub use artifact::{Artifact, ArtifactKind};
pub use scaler::{FittedScalerParams, Normalizer};
pub use inference::{load_classifier, Classifier};
pub use ensemble::{TreeEnsemble, TreeEnsembleClassifier};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use threshold::{ThreatLevel, ThreatScorer, ThreatThresholds};
