//! Feature Vector - Core data structure for ML input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses centralized layout from `layout.rs` for:
//! - Consistent feature ordering
//! - Version tracking
//! - Layout hash for compatibility checks
//!
//! Values are `f64`: integer-encoded IPv4 addresses need more than the
//! 24 bits of mantissa an `f32` offers.

use serde::{Deserialize, Serialize};

use super::ip::IpCodec;
use super::layout::{
    layout_hash, validate_layout, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION,
};
use super::protocol::ProtocolCodec;
use super::record::FlowRecord;
use crate::constants::PACKET_RATE_EPSILON;
use crate::error::DetectResult;
use crate::logic::config::CodecMode;

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn validate(&self) -> DetectResult<()> {
        validate_layout(self.version, self.layout_hash)
    }

    /// JSON form for debug logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// NORMALIZED VECTOR
// ============================================================================

/// Scaler output, consumed once by the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVector {
    pub layout_hash: u32,
    values: [f64; FEATURE_COUNT],
}

impl NormalizedVector {
    pub(crate) fn new(layout_hash: u32, values: [f64; FEATURE_COUNT]) -> Self {
        Self { layout_hash, values }
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// FEATURE BUILDER
// ============================================================================

/// FlowRecord -> FeatureVector, in FEATURE_LAYOUT order
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder {
    mode: CodecMode,
}

impl FeatureBuilder {
    pub fn new(mode: CodecMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CodecMode {
        self.mode
    }

    /// In lenient mode this never fails; strict mode surfaces codec failures
    pub fn build(&self, record: &FlowRecord) -> DetectResult<FeatureVector> {
        let (source, destination, protocol) = match self.mode {
            CodecMode::Lenient => (
                IpCodec::encode(&record.source_ip),
                IpCodec::encode(&record.destination_ip),
                ProtocolCodec::encode(&record.protocol),
            ),
            CodecMode::Strict => (
                IpCodec::parse(&record.source_ip)?,
                IpCodec::parse(&record.destination_ip)?,
                ProtocolCodec::parse(&record.protocol)?,
            ),
        };

        let duration = record.duration;
        let packet_size_total = record.packet_size_total as f64;

        Ok(FeatureVector::from_values([
            source as f64,
            destination as f64,
            protocol as f64,
            duration,
            packet_size_total,
            packet_rate(packet_size_total, duration),
        ]))
    }
}

/// Bytes per second, with duration guarded against zero
pub fn packet_rate(packet_size_total: f64, duration: f64) -> f64 {
    packet_size_total / (duration + PACKET_RATE_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectError;

    fn sample() -> FlowRecord {
        FlowRecord::new("192.168.1.10", "8.8.8.8", "TCP", 10.0, 500)
    }

    #[test]
    fn test_build_order() {
        let v = FeatureBuilder::default().build(&sample()).unwrap();
        let values = v.as_array();

        assert_eq!(values[0], 3_232_235_786.0);
        assert_eq!(values[1], 134_744_072.0);
        assert_eq!(values[2], 0.0);
        assert_eq!(values[3], 10.0);
        assert_eq!(values[4], 500.0);
        assert!((values[5] - 500.0 / (10.0 + 1e-5)).abs() < 1e-9);
        assert!(v.validate().is_ok());
    }

    #[test]
    fn test_zero_duration_uses_epsilon() {
        let record = FlowRecord::new("10.0.0.1", "10.0.0.2", "UDP", 0.0, 1200);
        let v = FeatureBuilder::default().build(&record).unwrap();

        let rate = v.as_array()[5];
        assert!(rate.is_finite());
        assert_eq!(rate, 1200.0 / 1e-5);
    }

    #[test]
    fn test_lenient_mode_defaults_malformed_fields() {
        let record = FlowRecord::new("not-an-ip", "8.8.8.8", "SCTP", 1.0, 10);
        let v = FeatureBuilder::new(CodecMode::Lenient).build(&record).unwrap();

        assert_eq!(v.as_array()[0], 0.0);
        assert_eq!(v.as_array()[2], 0.0);
    }

    #[test]
    fn test_strict_mode_rejects_malformed_fields() {
        let builder = FeatureBuilder::new(CodecMode::Strict);

        let bad_ip = FlowRecord::new("not-an-ip", "8.8.8.8", "TCP", 1.0, 10);
        assert!(matches!(
            builder.build(&bad_ip),
            Err(DetectError::MalformedInput { field: "ip", .. })
        ));

        let bad_proto = FlowRecord::new("1.1.1.1", "8.8.8.8", "SCTP", 1.0, 10);
        assert!(matches!(
            builder.build(&bad_proto),
            Err(DetectError::MalformedInput { field: "protocol", .. })
        ));

        assert!(builder.build(&sample()).is_ok());
    }

    #[test]
    fn test_to_log_entry() {
        let v = FeatureBuilder::default().build(&sample()).unwrap();
        let log = v.to_log_entry();
        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert_eq!(log["named_values"]["duration"], 10.0);
    }
}
