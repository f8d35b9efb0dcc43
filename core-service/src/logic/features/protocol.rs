//! Protocol Codec
//!
//! Transport protocol label -> category code. The table MUST match the one
//! the scaler and model were fitted with; it is folded into the layout hash.

use crate::error::{DetectError, DetectResult};

/// Label/code table, upper-case labels
pub const PROTOCOL_CODES: &[(&str, u8)] = &[
    ("TCP", 0),
    ("UDP", 1),
    ("ICMP", 2),
];

/// Code used for labels missing from the table (collides with TCP)
pub const UNKNOWN_PROTOCOL_CODE: u8 = 0;

pub struct ProtocolCodec;

impl ProtocolCodec {
    /// Fail-soft lookup, case-insensitive, no whitespace trimming
    pub fn encode(label: &str) -> u8 {
        match Self::lookup(label) {
            Some(code) => code,
            None => {
                log::debug!(
                    "Unknown protocol {:?}, using code {}",
                    label,
                    UNKNOWN_PROTOCOL_CODE
                );
                UNKNOWN_PROTOCOL_CODE
            }
        }
    }

    /// Strict lookup
    pub fn parse(label: &str) -> DetectResult<u8> {
        Self::lookup(label).ok_or_else(|| DetectError::MalformedInput {
            field: "protocol",
            value: label.to_string(),
        })
    }

    fn lookup(label: &str) -> Option<u8> {
        PROTOCOL_CODES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, code)| *code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_codes() {
        assert_eq!(ProtocolCodec::encode("TCP"), 0);
        assert_eq!(ProtocolCodec::encode("UDP"), 1);
        assert_eq!(ProtocolCodec::encode("ICMP"), 2);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(ProtocolCodec::encode("tcp"), ProtocolCodec::encode("TCP"));
        assert_eq!(ProtocolCodec::encode("tcp"), 0);
        assert_eq!(ProtocolCodec::encode("Udp"), 1);
        assert_eq!(ProtocolCodec::encode("icmp"), 2);
    }

    #[test]
    fn test_unknown_defaults_to_tcp_code() {
        assert_eq!(ProtocolCodec::encode("SCTP"), 0);
        assert_eq!(ProtocolCodec::encode(""), 0);
    }

    #[test]
    fn test_padded_label_is_unknown() {
        assert_eq!(ProtocolCodec::encode("UDP "), 0);
        assert_eq!(ProtocolCodec::encode(" icmp"), 0);
        assert!(matches!(
            ProtocolCodec::parse("UDP "),
            Err(DetectError::MalformedInput { field: "protocol", .. })
        ));
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!(ProtocolCodec::parse("udp").unwrap(), 1);
        assert!(matches!(
            ProtocolCodec::parse("gre"),
            Err(DetectError::MalformedInput { field: "protocol", .. })
        ));
    }
}
