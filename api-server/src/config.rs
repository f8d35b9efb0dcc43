//! Configuration module

use std::env;
use std::path::PathBuf;

use xdetect_core::DetectorConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Maximum records accepted by the batch endpoint
    pub max_batch_size: usize,

    /// Detection engine settings (artifacts, thresholds, audit log)
    pub detector: DetectorConfig,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `XDETECT_CONFIG` points to a JSON detector config; otherwise the
    /// detector reads its own `XDETECT_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let detector = match env::var("XDETECT_CONFIG") {
            Ok(path) => DetectorConfig::from_file(&PathBuf::from(path))?,
            Err(_) => DetectorConfig::from_env()?,
        };

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            max_batch_size: env::var("MAX_BATCH_SIZE")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(1000),

            detector,

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        })
    }
}
