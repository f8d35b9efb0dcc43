//! Features Module - Feature Extraction Engine
//!
//! Turns a raw `FlowRecord` into the fixed-order numeric vector the
//! scaler and model were fitted on.

pub mod ip;
pub mod protocol;
pub mod layout;
pub mod record;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use ip::IpCodec;
pub use protocol::{ProtocolCodec, PROTOCOL_CODES, UNKNOWN_PROTOCOL_CODE};
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use record::FlowRecord;
pub use vector::{FeatureBuilder, FeatureVector, NormalizedVector};
