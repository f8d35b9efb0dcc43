//! Error handling

use std::path::PathBuf;

pub type DetectResult<T> = Result<T, DetectError>;

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// Unparseable IP or protocol label (strict codec mode only)
    #[error("malformed {field}: {value:?}")]
    MalformedInput { field: &'static str, value: String },

    /// Record fields outside their domain (e.g. negative duration)
    #[error("invalid flow record: {0}")]
    InvalidRecord(String),

    /// Model or scaler artifact could not be loaded
    #[error("failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Artifact was fitted against a different feature layout
    #[error("feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), got v{actual_version} (hash: {actual_hash:08x})")]
    SchemaMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },

    /// Vector width diverges from what the fitted parameters expect
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Classifier failed or produced an unusable probability
    #[error("inference failed: {0}")]
    Inference(String),

    /// Appending to the audit log failed
    #[error("audit log write failed: {0}")]
    AuditWrite(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DetectError {
    pub fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DetectError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DetectError::MalformedInput { .. } | DetectError::InvalidRecord(_)
        )
    }
}
