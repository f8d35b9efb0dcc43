//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment variables override these through the helpers below.

use std::path::PathBuf;

/// Guard added to the duration before computing packet rate
pub const PACKET_RATE_EPSILON: f64 = 1e-5;

/// Probability at or above which a flow is predicted malicious
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Lower tier boundary (below = Low)
pub const DEFAULT_LOW_THRESHOLD: f64 = 0.4;

/// Upper tier boundary (at or above = High)
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.7;

/// Decimal places kept for probabilities written to the audit log
pub const AUDIT_PROBABILITY_DECIMALS: i32 = 4;

/// Default model artifact location
pub const DEFAULT_MODEL_PATH: &str = "models/xgboost_model.json";

/// Default scaler artifact location
pub const DEFAULT_SCALER_PATH: &str = "models/preprocessor.json";

/// Audit log file name
pub const AUDIT_LOG_FILE: &str = "prediction_logs.csv";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "X-Detect";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment or use default
pub fn get_model_path() -> PathBuf {
    std::env::var("XDETECT_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Get scaler artifact path from environment or use default
pub fn get_scaler_path() -> PathBuf {
    std::env::var("XDETECT_SCALER_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCALER_PATH))
}

/// Get audit log path from environment, falling back to the local data dir
pub fn get_audit_log_path() -> PathBuf {
    std::env::var("XDETECT_AUDIT_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_audit_log_path())
}

/// `<data_local_dir>/xdetect/logs/prediction_logs.csv`
pub fn default_audit_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("xdetect")
        .join("logs")
        .join(AUDIT_LOG_FILE)
}

/// Check if audit logging is enabled
pub fn is_audit_enabled() -> bool {
    std::env::var("XDETECT_AUDIT_ENABLED")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}

/// Read an f64 from the environment
pub fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Read a non-empty string from the environment
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
