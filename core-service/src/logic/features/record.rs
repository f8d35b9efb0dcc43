use serde::{Deserialize, Serialize};

use crate::error::{DetectError, DetectResult};

/// One summarized connection observation, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub source_ip: String,
    pub destination_ip: String,
    pub protocol: String,
    /// Seconds
    pub duration: f64,
    /// Bytes, both directions
    pub packet_size_total: u64,
}

impl FlowRecord {
    pub fn new(
        source_ip: impl Into<String>,
        destination_ip: impl Into<String>,
        protocol: impl Into<String>,
        duration: f64,
        packet_size_total: u64,
    ) -> Self {
        Self {
            source_ip: source_ip.into(),
            destination_ip: destination_ip.into(),
            protocol: protocol.into(),
            duration,
            packet_size_total,
        }
    }

    /// Reject values the feature transforms are undefined for
    pub fn validate(&self) -> DetectResult<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(DetectError::InvalidRecord(format!(
                "duration must be a non-negative number, got {}",
                self.duration
            )));
        }
        Ok(())
    }
}
