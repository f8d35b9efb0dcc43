//! IPv4 Codec
//!
//! Dotted-decimal IPv4 <-> big-endian u32 feature.
//!
//! `encode` is fail-soft: anything that is not a valid dotted quad maps to 0,
//! which is also the code of `0.0.0.0`. Use `parse` when the caller needs to
//! tell the two apart.

use std::net::Ipv4Addr;

use crate::error::{DetectError, DetectResult};

pub struct IpCodec;

impl IpCodec {
    /// Fail-soft encoding, 0 on malformed input
    pub fn encode(ip: &str) -> u32 {
        Self::parse(ip).unwrap_or(0)
    }

    /// Strict encoding
    pub fn parse(ip: &str) -> DetectResult<u32> {
        ip.trim()
            .parse::<Ipv4Addr>()
            .map(u32::from)
            .map_err(|_| DetectError::MalformedInput {
                field: "ip",
                value: ip.to_string(),
            })
    }

    pub fn decode(value: u32) -> String {
        Ipv4Addr::from(value).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_addresses() {
        assert_eq!(IpCodec::encode("0.0.0.0"), 0);
        assert_eq!(IpCodec::encode("0.0.0.1"), 1);
        assert_eq!(IpCodec::encode("8.8.8.8"), 0x0808_0808);
        assert_eq!(IpCodec::encode("192.168.1.10"), 3_232_235_786);
        assert_eq!(IpCodec::encode("255.255.255.255"), u32::MAX);
    }

    #[test]
    fn test_malformed_input_is_zero() {
        assert_eq!(IpCodec::encode("not-an-ip"), 0);
        assert_eq!(IpCodec::encode(""), 0);
        assert_eq!(IpCodec::encode("1.2.3"), 0);
        assert_eq!(IpCodec::encode("1.2.3.4.5"), 0);
        assert_eq!(IpCodec::encode("256.1.1.1"), 0);
        assert_eq!(IpCodec::encode("1.2.x.4"), 0);
        assert_ne!(IpCodec::encode("192.168.1.10"), 0);
    }

    #[test]
    fn test_parse_distinguishes_zero_from_failure() {
        assert_eq!(IpCodec::parse("0.0.0.0").unwrap(), 0);
        assert!(matches!(
            IpCodec::parse("not-an-ip"),
            Err(DetectError::MalformedInput { field: "ip", .. })
        ));
    }

    #[test]
    fn test_round_trip() {
        for ip in ["10.0.0.1", "172.16.254.3", "192.168.1.10", "8.8.4.4", "255.0.255.0"] {
            assert_eq!(IpCodec::decode(IpCodec::encode(ip)), ip);
        }

        // Sample the address space with a stride that hits every octet
        let mut value: u32 = 7;
        for _ in 0..10_000 {
            assert_eq!(IpCodec::encode(&IpCodec::decode(value)), value);
            value = value.wrapping_add(429_497);
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(IpCodec::encode(" 8.8.8.8 "), IpCodec::encode("8.8.8.8"));
    }
}
