//! ONNX Runtime backend (`onnx` feature)
//!
//! The `.onnx` file is opaque, so its feature layout lives in a sidecar
//! `<model>.onnx.json` artifact of kind `onnx_metadata`.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::artifact::{load_artifact, verify_checksum, ArtifactKind};
use super::inference::{check_input_width, check_probability, Classifier};
use crate::error::{DetectError, DetectResult};
use crate::logic::features::{NormalizedVector, FEATURE_COUNT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnnxMetadata {
    /// Output holding class probabilities; last output when absent
    #[serde(default)]
    pub probability_output: Option<String>,
    /// Column of the malicious class in the probability output
    #[serde(default = "default_positive_class")]
    pub positive_class_index: usize,
}

fn default_positive_class() -> usize {
    1
}

pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
    positive_class_index: usize,
    name: String,
}

impl OnnxClassifier {
    pub fn metadata_path(model_path: &Path) -> PathBuf {
        PathBuf::from(format!("{}.json", model_path.display()))
    }

    pub fn load(model_path: &Path, expected_sha256: Option<&str>) -> DetectResult<Self> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(DetectError::artifact(model_path, "file not found"));
        }
        if let Some(expected) = expected_sha256 {
            verify_checksum(model_path, expected)?;
        }

        let metadata = load_artifact::<OnnxMetadata>(
            &Self::metadata_path(model_path),
            ArtifactKind::OnnxMetadata,
            None,
        )?
        .payload;

        let session = Session::builder()
            .map_err(|e| DetectError::artifact(model_path, format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| DetectError::artifact(model_path, format!("optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| DetectError::artifact(model_path, format!("load: {}", e)))?;

        let output_name = match metadata.probability_output {
            Some(name) => name,
            None => session
                .outputs
                .last()
                .map(|o| o.name.clone())
                .ok_or_else(|| DetectError::artifact(model_path, "model defines no outputs"))?,
        };

        log::info!("ONNX model loaded, reading output {:?}", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            positive_class_index: metadata.positive_class_index,
            name: format!("onnx({})", model_path.display()),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_probability(&self, input: &NormalizedVector) -> DetectResult<f64> {
        check_input_width(self, input)?;

        let data: Vec<f32> = input.as_slice().iter().map(|v| *v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), data)
            .map_err(|e| DetectError::Inference(format!("failed to create array: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| DetectError::Inference(format!("failed to create tensor: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| DetectError::Inference(format!("inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| DetectError::Inference(format!("missing output {}", self.output_name)))?;
        let (_, values) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| DetectError::Inference(format!("failed to extract output: {}", e)))?;

        // Single-column outputs carry the positive probability directly
        let probability = if values.len() > self.positive_class_index {
            values[self.positive_class_index]
        } else {
            *values
                .first()
                .ok_or_else(|| DetectError::Inference("empty probability output".to_string()))?
        };

        check_probability(probability as f64)
    }

    fn input_width(&self) -> usize {
        FEATURE_COUNT
    }

    fn name(&self) -> &str {
        &self.name
    }
}
