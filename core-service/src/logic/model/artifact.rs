//! Artifact Loading
//!
//! Model and scaler artifacts are versioned JSON envelopes:
//!
//! ```json
//! { "kind": "standard_scaler", "schema": { ...LayoutInfo... }, "payload": { ... } }
//! ```
//!
//! Loading verifies, in order: the optional SHA-256 of the raw bytes, the
//! JSON structure, the artifact kind, and the feature layout it was fitted on.

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DetectError, DetectResult};
use crate::logic::features::LayoutInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    StandardScaler,
    TreeEnsemble,
    /// Sidecar metadata for an ONNX model file
    OnnxMetadata,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::StandardScaler => "standard_scaler",
            ArtifactKind::TreeEnsemble => "tree_ensemble",
            ArtifactKind::OnnxMetadata => "onnx_metadata",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact<T> {
    pub kind: ArtifactKind,
    pub schema: LayoutInfo,
    pub payload: T,
}

impl<T> Artifact<T> {
    /// Wrap a payload with the current layout
    pub fn new(kind: ArtifactKind, payload: T) -> Self {
        Self {
            kind,
            schema: LayoutInfo::current(),
            payload,
        }
    }
}

/// Compute SHA256 hash of file, lowercase hex
pub fn compute_file_hash(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compare a file's SHA-256 against the expected hex digest
pub fn verify_checksum(path: &Path, expected: &str) -> DetectResult<()> {
    let actual = compute_file_hash(path).map_err(|e| DetectError::artifact(path, e))?;

    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(DetectError::artifact(
            path,
            format!("checksum mismatch: expected {}, got {}", expected, actual),
        ));
    }
    Ok(())
}

/// Read, verify and decode an artifact of the given kind
pub fn load_artifact<T: DeserializeOwned>(
    path: &Path,
    kind: ArtifactKind,
    expected_sha256: Option<&str>,
) -> DetectResult<Artifact<T>> {
    log::info!("Loading {} artifact from: {}", kind.as_str(), path.display());

    if !path.exists() {
        return Err(DetectError::artifact(path, "file not found"));
    }

    if let Some(expected) = expected_sha256 {
        verify_checksum(path, expected)?;
    }

    let content = std::fs::read(path).map_err(|e| DetectError::artifact(path, e))?;
    let artifact: Artifact<T> = serde_json::from_slice(&content)
        .map_err(|e| DetectError::artifact(path, format!("corrupt artifact: {}", e)))?;

    if artifact.kind != kind {
        return Err(DetectError::artifact(
            path,
            format!(
                "expected a {} artifact, found {}",
                kind.as_str(),
                artifact.kind.as_str()
            ),
        ));
    }

    artifact.schema.validate()?;

    Ok(artifact)
}

/// Write an artifact as pretty JSON (fixtures and tooling)
pub fn save_artifact<T: Serialize>(path: &Path, artifact: &Artifact<T>) -> DetectResult<()> {
    let json = serde_json::to_vec_pretty(artifact)
        .map_err(|e| DetectError::artifact(path, e))?;
    std::fs::write(path, json).map_err(|e| DetectError::artifact(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Dummy {
        value: u32,
    }

    fn write_dummy(dir: &TempDir, kind: ArtifactKind) -> std::path::PathBuf {
        let path = dir.path().join("artifact.json");
        save_artifact(&path, &Artifact::new(kind, Dummy { value: 7 })).unwrap();
        path
    }

    #[test]
    fn test_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = write_dummy(&dir, ArtifactKind::StandardScaler);

        let loaded: Artifact<Dummy> =
            load_artifact(&path, ArtifactKind::StandardScaler, None).unwrap();
        assert_eq!(loaded.payload, Dummy { value: 7 });
        assert_eq!(loaded.schema, LayoutInfo::current());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result: DetectResult<Artifact<Dummy>> = load_artifact(
            &dir.path().join("nope.json"),
            ArtifactKind::StandardScaler,
            None,
        );
        assert!(matches!(result, Err(DetectError::ArtifactLoad { .. })));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let result: DetectResult<Artifact<Dummy>> =
            load_artifact(&path, ArtifactKind::StandardScaler, None);
        assert!(matches!(result, Err(DetectError::ArtifactLoad { .. })));
    }

    #[test]
    fn test_wrong_kind() {
        let dir = TempDir::new().unwrap();
        let path = write_dummy(&dir, ArtifactKind::TreeEnsemble);

        let result: DetectResult<Artifact<Dummy>> =
            load_artifact(&path, ArtifactKind::StandardScaler, None);
        assert!(matches!(result, Err(DetectError::ArtifactLoad { .. })));
    }

    #[test]
    fn test_schema_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.json");
        let mut artifact = Artifact::new(ArtifactKind::StandardScaler, Dummy { value: 1 });
        artifact.schema.version += 1;
        save_artifact(&path, &artifact).unwrap();

        let result: DetectResult<Artifact<Dummy>> =
            load_artifact(&path, ArtifactKind::StandardScaler, None);
        assert!(matches!(result, Err(DetectError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_checksum() {
        let dir = TempDir::new().unwrap();
        let path = write_dummy(&dir, ArtifactKind::StandardScaler);
        let digest = compute_file_hash(&path).unwrap();
        assert_eq!(digest.len(), 64);

        let ok: DetectResult<Artifact<Dummy>> =
            load_artifact(&path, ArtifactKind::StandardScaler, Some(&digest.to_uppercase()));
        assert!(ok.is_ok());

        let wrong = "0".repeat(64);
        let bad: DetectResult<Artifact<Dummy>> =
            load_artifact(&path, ArtifactKind::StandardScaler, Some(&wrong));
        assert!(matches!(bad, Err(DetectError::ArtifactLoad { .. })));
    }
}
