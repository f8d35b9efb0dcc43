//! Integration Tests for Feature Extraction
//!
//! Codecs, builder and layout exercised together.

#[cfg(test)]
mod integration_tests {
    use crate::logic::config::CodecMode;
    use crate::logic::features::{
        FeatureBuilder, FlowRecord, IpCodec, LayoutInfo, ProtocolCodec, FEATURE_COUNT,
    };

    /// Values produced by a live connection scan, with placeholder duration/size
    #[test]
    fn test_live_scan_placeholders_are_plain_input() {
        let builder = FeatureBuilder::new(CodecMode::Strict);
        let record = FlowRecord::new("10.0.0.5", "140.82.112.4", "TCP", 10.0, 1000);

        let v = builder.build(&record).unwrap();
        let values = v.as_array();
        assert_eq!(values[3], 10.0);
        assert_eq!(values[4], 1000.0);
        assert!((values[5] - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = FeatureBuilder::default();
        let record = FlowRecord::new("192.168.1.10", "8.8.8.8", "udp", 2.5, 4096);

        let a = builder.build(&record).unwrap();
        let b = builder.build(&record).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_vector_matches_codecs() {
        let record = FlowRecord::new("172.16.0.9", "1.1.1.1", "icmp", 0.25, 84);
        let v = FeatureBuilder::default().build(&record).unwrap();

        assert_eq!(v.as_slice().len(), FEATURE_COUNT);
        assert_eq!(v.as_array()[0], IpCodec::encode("172.16.0.9") as f64);
        assert_eq!(v.as_array()[1], IpCodec::encode("1.1.1.1") as f64);
        assert_eq!(v.as_array()[2], ProtocolCodec::encode("ICMP") as f64);
    }

    #[test]
    fn test_vector_layout_matches_layout_info() {
        let v = FeatureBuilder::default()
            .build(&FlowRecord::new("1.2.3.4", "5.6.7.8", "TCP", 1.0, 1))
            .unwrap();
        let info = LayoutInfo::current();

        assert_eq!(v.version, info.version);
        assert_eq!(v.layout_hash, info.hash);
        assert_eq!(info.feature_count, v.as_slice().len());
    }

    #[test]
    fn test_distinct_addresses_give_distinct_features() {
        let builder = FeatureBuilder::default();
        let a = builder
            .build(&FlowRecord::new("10.0.0.1", "10.0.0.2", "TCP", 1.0, 1))
            .unwrap();
        let b = builder
            .build(&FlowRecord::new("10.0.0.2", "10.0.0.1", "TCP", 1.0, 1))
            .unwrap();

        assert_ne!(a.as_array()[0], b.as_array()[0]);
        assert_eq!(a.as_array()[0], b.as_array()[1]);
    }
}
