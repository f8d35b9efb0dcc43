//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema shared with the
//! fitted scaler and the trained model.**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//! 4. Change the protocol code table → increment FEATURE_VERSION
//!
//! Artifacts carry the `LayoutInfo` they were fitted with and are rejected
//! at load time when it differs from the one compiled in here.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::protocol::PROTOCOL_CODES;
use crate::error::DetectError;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "source_ip_int",      // 0: big-endian u32 of the source address
    "destination_ip_int", // 1: big-endian u32 of the destination address
    "protocol_encoded",   // 2: ProtocolCodec category
    "duration",           // 3: seconds, verbatim
    "packet_size_total",  // 4: bytes (both directions), verbatim
    "packet_rate",        // 5: packet_size_total / (duration + eps)
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 6;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version, feature names and the protocol code table
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    // Protocol categories are part of the contract with the fitted model
    for (label, code) in PROTOCOL_CODES {
        hasher.update(label.as_bytes());
        hasher.update(&[*code, 0]);
    }

    hasher.finalize()
}

pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information, embedded in every artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Full check: version, hash and the named order must all agree
    pub fn validate(&self) -> Result<(), DetectError> {
        validate_layout(self.version, self.hash)?;

        if self.feature_count != FEATURE_COUNT || self.feature_names.len() != FEATURE_COUNT {
            return Err(DetectError::DimensionMismatch {
                context: "artifact layout",
                expected: FEATURE_COUNT,
                actual: self.feature_names.len().max(self.feature_count),
            });
        }

        let same_order = self
            .feature_names
            .iter()
            .zip(FEATURE_LAYOUT.iter())
            .all(|(a, b)| a == b);
        if !same_order {
            return Err(mismatch(self.version, self.hash));
        }

        Ok(())
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

fn mismatch(actual_version: u8, actual_hash: u32) -> DetectError {
    DetectError::SchemaMismatch {
        expected_version: FEATURE_VERSION,
        expected_hash: layout_hash(),
        actual_version,
        actual_hash,
    }
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), DetectError> {
    if incoming_version != FEATURE_VERSION || incoming_hash != layout_hash() {
        return Err(mismatch(incoming_version, incoming_hash));
    }
    Ok(())
}
