// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Stack Synthesis
//!
//! Each case builds its own artifact directory, so case counts are kept low.

use proptest::prelude::*;
use std::fs;

use ohw_infrastructure::domain::{EndpointType, ResourceKind, Throttling};
use ohw_infrastructure::{synthesize, OneHitWonderStack};

use crate::fixtures::{artifact, config, zones};

fn region() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "us-east-1",
        "us-west-2",
        "eu-west-1",
        "eu-west-2",
        "eu-central-1",
        "ap-northeast-1",
        "ap-southeast-2",
        "sa-east-1",
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// EDGE certificates are issued in us-east-1 from any stack region
    #[test]
    fn prop_edge_certificate_region(region in region()) {
        let artifact = artifact();
        let stack = OneHitWonderStack::new(config(&artifact).with_region(region), &zones()).unwrap();

        prop_assert_eq!(stack.certificate().region.as_str(), "us-east-1");
    }

    /// REGIONAL certificates follow the stack region
    #[test]
    fn prop_regional_certificate_region(region in region()) {
        let artifact = artifact();
        let config = config(&artifact)
            .with_region(region)
            .with_endpoint_type(EndpointType::Regional);
        let stack = OneHitWonderStack::new(config, &zones()).unwrap();

        prop_assert_eq!(stack.certificate().region.as_str(), region);
    }

    /// Any positive throttling lands on the stage unchanged
    #[test]
    fn prop_throttling_preserved(burst in 1u32..10_000, rate in 0.5f64..10_000.0) {
        let artifact = artifact();
        let stack = OneHitWonderStack::new(
            config(&artifact).with_throttling(Throttling::new(burst, rate)),
            &zones(),
        )
        .unwrap();

        let stage = stack.template().resource(&stack.gateway().stage_id).unwrap();
        let settings = &stage.properties["MethodSettings"][0];
        prop_assert_eq!(settings["ThrottlingBurstLimit"].as_u64(), Some(u64::from(burst)));
        prop_assert_eq!(settings["ThrottlingRateLimit"].as_f64(), Some(rate));
    }

    /// Synthesis is byte-identical for any artifact contents
    #[test]
    fn prop_synthesis_deterministic(contents in prop::collection::vec(any::<u8>(), 0..256)) {
        let artifact = artifact();
        fs::write(artifact.path().join("bootstrap"), &contents).unwrap();

        let first = synthesize(config(&artifact), &zones()).unwrap().render().unwrap();
        let second = synthesize(config(&artifact), &zones()).unwrap().render().unwrap();
        prop_assert_eq!(first, second);
    }

    /// The declared resource counts never depend on the region
    #[test]
    fn prop_resource_shape_region_independent(region in region()) {
        let artifact = artifact();
        let stack = OneHitWonderStack::new(config(&artifact).with_region(region), &zones()).unwrap();
        let template = stack.template();

        prop_assert_eq!(template.resources_of_kind(ResourceKind::DnsValidatedCertificate).len(), 1);
        prop_assert_eq!(template.resources_of_kind(ResourceKind::ApiDomainName).len(), 1);
        prop_assert_eq!(template.resources_of_kind(ResourceKind::RecordSet).len(), 1);
        prop_assert_eq!(template.resources_of_kind(ResourceKind::ApiStage).len(), 1);
    }
}
