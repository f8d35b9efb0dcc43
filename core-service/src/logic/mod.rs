//! Logic Module - Detection Engine
//!
//! ## Architecture
//! - `features/` - FlowRecord to fixed-order feature vector (IP/protocol codecs)
//! - `model/` - Artifacts, normalization, classifier backends, threat tiers
//! - `audit/` - Append-only CSV prediction log
//! - `pipeline/` - End-to-end scoring and engine status
//! - `config.rs` - DetectorConfig and codec mode

pub mod config;
pub mod features;
pub mod model;
pub mod audit;
pub mod pipeline;
