//! Normalizer - fitted standard scaler applied at inference time

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::artifact::{load_artifact, ArtifactKind};
use crate::error::{DetectError, DetectResult};
use crate::logic::features::{FeatureVector, NormalizedVector, FEATURE_COUNT, FEATURE_LAYOUT};

/// Per-feature mean/scale learned in training, in FEATURE_LAYOUT order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FittedScalerParams {
    /// Identity transform (mean 0, scale 1)
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    pub fn validate(&self) -> DetectResult<()> {
        for (context, values) in [("scaler mean", &self.mean), ("scaler scale", &self.scale)] {
            if values.len() != FEATURE_COUNT {
                return Err(DetectError::DimensionMismatch {
                    context,
                    expected: FEATURE_COUNT,
                    actual: values.len(),
                });
            }
        }

        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(DetectError::Config(format!(
                "scaler mean for {} is not finite",
                FEATURE_LAYOUT[i]
            )));
        }
        if let Some(i) = self.scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(DetectError::Config(format!(
                "scaler scale for {} must be finite and non-zero, got {}",
                FEATURE_LAYOUT[i], self.scale[i]
            )));
        }

        Ok(())
    }

    /// `(v[i] - mean[i]) / scale[i]`, failing fast on any width mismatch
    pub fn transform(&self, vector: &FeatureVector) -> DetectResult<NormalizedVector> {
        let values = vector.as_slice();
        for (context, params) in [("scaler mean", &self.mean), ("scaler scale", &self.scale)] {
            if params.len() != values.len() {
                return Err(DetectError::DimensionMismatch {
                    context,
                    expected: values.len(),
                    actual: params.len(),
                });
            }
        }

        let mut normalized = [0.0f64; FEATURE_COUNT];
        for (i, out) in normalized.iter_mut().enumerate() {
            *out = (values[i] - self.mean[i]) / self.scale[i];
        }

        Ok(NormalizedVector::new(vector.layout_hash, normalized))
    }
}

/// Read-only wrapper, validated once at construction
#[derive(Debug, Clone)]
pub struct Normalizer {
    params: FittedScalerParams,
}

impl Normalizer {
    pub fn new(params: FittedScalerParams) -> DetectResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Load a `standard_scaler` artifact
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> DetectResult<Self> {
        let artifact = load_artifact::<FittedScalerParams>(
            path,
            ArtifactKind::StandardScaler,
            expected_sha256,
        )?;

        let normalizer = Self::new(artifact.payload)
            .map_err(|e| DetectError::artifact(path, e))?;
        log::info!("Scaler loaded ({} features)", FEATURE_COUNT);
        Ok(normalizer)
    }

    pub fn params(&self) -> &FittedScalerParams {
        &self.params
    }

    pub fn transform(&self, vector: &FeatureVector) -> DetectResult<NormalizedVector> {
        vector.validate()?;
        self.params.transform(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::artifact::{save_artifact, Artifact};

    fn params() -> FittedScalerParams {
        FittedScalerParams {
            mean: vec![10.0, 20.0, 1.0, 5.0, 100.0, 50.0],
            scale: vec![2.0, 4.0, 1.0, 0.5, 10.0, 25.0],
        }
    }

    #[test]
    fn test_transform() {
        let normalizer = Normalizer::new(params()).unwrap();
        let v = FeatureVector::from_values([12.0, 20.0, 0.0, 6.0, 150.0, 0.0]);

        let n = normalizer.transform(&v).unwrap();
        assert_eq!(n.as_array(), &[1.0, 0.0, -1.0, 2.0, 5.0, -2.0]);
        assert_eq!(n.layout_hash, v.layout_hash);
    }

    #[test]
    fn test_identity() {
        let normalizer = Normalizer::new(FittedScalerParams::identity()).unwrap();
        let v = FeatureVector::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(normalizer.transform(&v).unwrap().as_slice(), v.as_slice());
    }

    #[test]
    fn test_dimension_mismatch_fails_fast() {
        let mut bad = params();
        bad.mean.pop();

        assert!(matches!(
            Normalizer::new(bad.clone()),
            Err(DetectError::DimensionMismatch { expected: 6, actual: 5, .. })
        ));

        let v = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        assert!(matches!(
            bad.transform(&v),
            Err(DetectError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let mut bad = params();
        bad.scale[3] = 0.0;
        assert!(matches!(Normalizer::new(bad), Err(DetectError::Config(_))));
    }

    #[test]
    fn test_incompatible_vector_rejected() {
        let normalizer = Normalizer::new(params()).unwrap();
        let mut v = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        v.version += 1;
        assert!(matches!(
            normalizer.transform(&v),
            Err(DetectError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_load_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preprocessor.json");
        save_artifact(&path, &Artifact::new(ArtifactKind::StandardScaler, params())).unwrap();

        let normalizer = Normalizer::load(&path, None).unwrap();
        assert_eq!(normalizer.params(), &params());
    }

    #[test]
    fn test_load_rejects_bad_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preprocessor.json");
        let mut bad = params();
        bad.scale = vec![1.0; 3];
        save_artifact(&path, &Artifact::new(ArtifactKind::StandardScaler, bad)).unwrap();

        assert!(matches!(
            Normalizer::load(&path, None),
            Err(DetectError::ArtifactLoad { .. })
        ));
    }
}
