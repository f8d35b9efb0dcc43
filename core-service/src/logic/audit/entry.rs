use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::constants::AUDIT_PROBABILITY_DECIMALS;
use crate::logic::features::FlowRecord;
use crate::logic::model::ThreatLevel;

/// CSV column order
pub const AUDIT_HEADER: [&str; 9] = [
    "timestamp",
    "source_ip",
    "destination_ip",
    "protocol",
    "duration",
    "prediction",
    "probability",
    "threat_level",
    "description",
];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One audit row per prediction request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Local>,
    pub source_ip: String,
    pub destination_ip: String,
    pub protocol: String,
    pub duration: f64,
    pub prediction: bool,
    /// Already rounded to AUDIT_PROBABILITY_DECIMALS
    pub probability: f64,
    pub threat_level: ThreatLevel,
    pub description: String,
}

impl AuditEntry {
    pub fn new(
        record: &FlowRecord,
        prediction: bool,
        probability: f64,
        threat_level: ThreatLevel,
        description: &str,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            source_ip: record.source_ip.clone(),
            destination_ip: record.destination_ip.clone(),
            protocol: record.protocol.clone(),
            duration: record.duration,
            prediction,
            probability: round_probability(probability),
            threat_level,
            description: description.to_string(),
        }
    }

    /// Fields in AUDIT_HEADER order, unescaped
    pub fn to_fields(&self) -> [String; 9] {
        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.source_ip.clone(),
            self.destination_ip.clone(),
            self.protocol.clone(),
            format!("{:?}", self.duration),
            if self.prediction { "1" } else { "0" }.to_string(),
            self.probability.to_string(),
            self.threat_level.as_str().to_string(),
            self.description.clone(),
        ]
    }
}

pub fn round_probability(probability: f64) -> f64 {
    let factor = 10f64.powi(AUDIT_PROBABILITY_DECIMALS);
    (probability * factor).round() / factor
}
