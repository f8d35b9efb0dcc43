//! Threat Tier Thresholds
//!
//! Maps a classifier probability to a discrete threat tier and its
//! description. Pure and total over [0, 1].

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD};
use crate::error::{DetectError, DetectResult};

// ============================================================================
// THREAT LEVEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "Low",
            ThreatLevel::Medium => "Medium",
            ThreatLevel::High => "High",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "Minimal or no malicious activity detected.",
            ThreatLevel::Medium => "Suspicious behavior detected. Requires inspection.",
            ThreatLevel::High => "Potential threat! Immediate attention recommended.",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Tier boundaries: `p < low` Low, `low <= p < high` Medium, `p >= high` High
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatThresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for ThreatThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl ThreatThresholds {
    pub fn new(low: f64, high: f64) -> DetectResult<Self> {
        let thresholds = Self { low, high };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> DetectResult<()> {
        let ordered = 0.0 <= self.low && self.low <= self.high && self.high <= 1.0;
        if !ordered {
            return Err(DetectError::Config(format!(
                "threat thresholds must satisfy 0 <= low <= high <= 1, got low={} high={}",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SCORER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreatScorer {
    thresholds: ThreatThresholds,
}

impl ThreatScorer {
    pub fn new(thresholds: ThreatThresholds) -> DetectResult<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> ThreatThresholds {
        self.thresholds
    }

    pub fn level(&self, probability: f64) -> ThreatLevel {
        if probability < self.thresholds.low {
            ThreatLevel::Low
        } else if probability < self.thresholds.high {
            ThreatLevel::Medium
        } else {
            ThreatLevel::High
        }
    }

    pub fn classify(&self, probability: f64) -> (ThreatLevel, &'static str) {
        let level = self.level(probability);
        (level, level.description())
    }
}
