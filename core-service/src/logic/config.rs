//! Detector Configuration
//!
//! Artifact locations, decision thresholds and codec behaviour.
//! Can be loaded from a JSON file, from `XDETECT_*` environment variables,
//! or built in code.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{self, DEFAULT_DECISION_THRESHOLD};
use crate::error::{DetectError, DetectResult};
use crate::logic::model::threshold::ThreatThresholds;

// ============================================================================
// CODEC MODE
// ============================================================================

/// How the feature builder treats unparseable IPs and unknown protocols
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecMode {
    /// Malformed fields encode as 0, compatible with the fitted artifacts
    #[default]
    Lenient,
    /// Malformed fields fail the request with `MalformedInput`
    Strict,
}

impl std::str::FromStr for CodecMode {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(CodecMode::Lenient),
            "strict" => Ok(CodecMode::Strict),
            other => Err(DetectError::Config(format!("unknown codec mode {:?}", other))),
        }
    }
}

// ============================================================================
// DETECTOR CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Model artifact (tree ensemble JSON, or `.onnx` with the `onnx` feature)
    pub model_path: PathBuf,
    /// Scaler artifact (JSON)
    pub scaler_path: PathBuf,
    /// Expected SHA-256 of the model file, hex
    pub model_sha256: Option<String>,
    /// Expected SHA-256 of the scaler file, hex
    pub scaler_sha256: Option<String>,
    /// Audit log CSV, `None` disables auditing
    pub audit_log_path: Option<PathBuf>,
    /// Threat tier boundaries
    pub thresholds: ThreatThresholds,
    /// Probability at or above which `prediction` is true
    pub decision_threshold: f64,
    pub codec_mode: CodecMode,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            scaler_path: PathBuf::from(constants::DEFAULT_SCALER_PATH),
            model_sha256: None,
            scaler_sha256: None,
            audit_log_path: Some(constants::default_audit_log_path()),
            thresholds: ThreatThresholds::default(),
            decision_threshold: DEFAULT_DECISION_THRESHOLD,
            codec_mode: CodecMode::Lenient,
        }
    }
}

impl DetectorConfig {
    /// Strict mode - malformed input is rejected instead of defaulted
    pub fn strict() -> Self {
        Self {
            codec_mode: CodecMode::Strict,
            ..Default::default()
        }
    }

    /// Defaults overridden by `XDETECT_*` environment variables
    pub fn from_env() -> DetectResult<Self> {
        let mut config = Self {
            model_path: constants::get_model_path(),
            scaler_path: constants::get_scaler_path(),
            model_sha256: constants::env_string("XDETECT_MODEL_SHA256"),
            scaler_sha256: constants::env_string("XDETECT_SCALER_SHA256"),
            audit_log_path: constants::is_audit_enabled()
                .then(constants::get_audit_log_path),
            ..Default::default()
        };

        if let Some(low) = constants::env_f64("XDETECT_LOW_THRESHOLD") {
            config.thresholds.low = low;
        }
        if let Some(high) = constants::env_f64("XDETECT_HIGH_THRESHOLD") {
            config.thresholds.high = high;
        }
        if let Some(decision) = constants::env_f64("XDETECT_DECISION_THRESHOLD") {
            config.decision_threshold = decision;
        }
        if let Some(mode) = constants::env_string("XDETECT_CODEC_MODE") {
            config.codec_mode = mode.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file; missing keys take their defaults
    pub fn from_file(path: &Path) -> DetectResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DetectError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| DetectError::Config(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DetectResult<()> {
        self.thresholds.validate()?;

        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(DetectError::Config(format!(
                "decision_threshold must be within [0, 1], got {}",
                self.decision_threshold
            )));
        }

        for digest in [&self.model_sha256, &self.scaler_sha256].into_iter().flatten() {
            if digest.len() != 64 || hex::decode(digest).is_err() {
                return Err(DetectError::Config(format!(
                    "expected a 64-digit hex SHA-256, got {:?}",
                    digest
                )));
            }
        }

        Ok(())
    }
}
