//! Inference Engine - classifier capability
//!
//! The pipeline only knows the `Classifier` trait. Concrete backends:
//! - `TreeEnsembleClassifier` (JSON gradient-boosted trees, always built)
//! - `OnnxClassifier` (ONNX Runtime, `onnx` feature)

use std::path::Path;
use std::sync::Arc;

use crate::error::{DetectError, DetectResult};
use crate::logic::features::NormalizedVector;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Trained binary model exposing the positive-class probability
pub trait Classifier: Send + Sync {
    /// Probability of the malicious class, in [0, 1]
    fn predict_probability(&self, input: &NormalizedVector) -> DetectResult<f64>;

    /// Input width the model was trained on
    fn input_width(&self) -> usize;

    fn name(&self) -> &str;
}

/// Reject width mismatches before the model indexes into the input
pub fn check_input_width(
    classifier: &dyn Classifier,
    input: &NormalizedVector,
) -> DetectResult<()> {
    if classifier.input_width() != input.len() {
        return Err(DetectError::DimensionMismatch {
            context: "classifier input",
            expected: classifier.input_width(),
            actual: input.len(),
        });
    }
    Ok(())
}

/// Reject NaN/inf and values outside [0, 1]
pub fn check_probability(probability: f64) -> DetectResult<f64> {
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(DetectError::Inference(format!(
            "classifier returned invalid probability {}",
            probability
        )));
    }
    Ok(probability)
}

pub fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

// ============================================================================
// LOADING
// ============================================================================

/// Load the model artifact, choosing the backend by file extension
pub fn load_classifier(
    path: &Path,
    expected_sha256: Option<&str>,
) -> DetectResult<Arc<dyn Classifier>> {
    let is_onnx = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("onnx"));

    if is_onnx {
        #[cfg(feature = "onnx")]
        {
            let model = super::onnx::OnnxClassifier::load(path, expected_sha256)?;
            return Ok(Arc::new(model));
        }

        #[cfg(not(feature = "onnx"))]
        return Err(DetectError::artifact(
            path,
            "ONNX models require the `onnx` feature",
        ));
    }

    let model = super::ensemble::TreeEnsembleClassifier::load(path, expected_sha256)?;
    Ok(Arc::new(model))
}
