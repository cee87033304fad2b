// Copyright (c) 2025 - Cowboy AI, Inc.
//! DNS alias record

use serde_json::{json, Value};
use tracing::info;

use super::hosted_zone::HostedZoneAttributes;
use crate::construct::NodeId;
use crate::domain::{invariants, DomainName, ResourceKind};
use crate::errors::SynthResult;
use crate::stack::Stack;
use crate::template::Resource;

/// Properties of an [`ARecord`]
#[derive(Debug, Clone)]
pub struct RecordProps<'a> {
    /// Name relative to the zone (`ohw-server`) or fully qualified
    pub record_name: &'a str,
    pub zone_name: &'a DomainName,
    pub hosted_zone: &'a HostedZoneAttributes,
    /// `{ DNSName, HostedZoneId }` of the aliased resource
    pub target: Value,
}

/// A declared alias A record
#[derive(Debug, Clone)]
pub struct ARecord {
    pub logical_id: String,
    pub name: DomainName,
}

impl ARecord {
    pub fn new(
        stack: &mut Stack,
        parent: NodeId,
        id: &str,
        props: RecordProps<'_>,
    ) -> SynthResult<Self> {
        let name = qualify(props.record_name, props.zone_name)?;
        invariants::validate_record_in_zone(&name, props.zone_name)?;

        let mut alias = props.target;
        alias["EvaluateTargetHealth"] = json!(false);

        let scope = stack.scope(parent, id)?;
        let logical_id = stack.declare(
            scope,
            "Resource",
            Resource::new(
                ResourceKind::RecordSet,
                json!({
                    "Name": name.to_absolute(),
                    "Type": "A",
                    "HostedZoneId": props.hosted_zone.zone_id(),
                    "AliasTarget": alias,
                }),
            ),
        )?;

        info!(record = %name, zone = %props.zone_name, "Declared alias record");
        Ok(Self { logical_id, name })
    }
}

/// Fully qualify a record name within `zone`
///
/// Names already ending in the zone (with or without trailing dot) are
/// taken as given. Anything else is a label relative to the zone.
fn qualify(record_name: &str, zone: &DomainName) -> SynthResult<DomainName> {
    let trimmed = record_name.trim_end_matches('.');
    let lowered = trimmed.to_ascii_lowercase();
    if lowered == zone.as_str() || lowered.ends_with(&format!(".{zone}")) {
        return Ok(DomainName::new(trimmed)?);
    }
    Ok(zone.subdomain(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::errors::SynthError;
    use crate::template::intrinsic::get_att;
    use std::collections::BTreeMap;
    use test_case::test_case;

    fn zone() -> (DomainName, HostedZoneAttributes) {
        (
            DomainName::new("jun.codes").unwrap(),
            HostedZoneAttributes {
                id: "/hostedzone/Z0ABCDEF".to_string(),
                name: "jun.codes.".to_string(),
            },
        )
    }

    #[test_case("ohw-server" ; "relative name")]
    #[test_case("ohw-server.jun.codes" ; "qualified name")]
    #[test_case("ohw-server.jun.codes." ; "absolute name")]
    #[test_case("OHW-Server.Jun.Codes" ; "mixed case name")]
    fn test_record_names_qualified(record_name: &str) {
        let (zone_name, _) = zone();
        assert_eq!(
            qualify(record_name, &zone_name).unwrap().as_str(),
            "ohw-server.jun.codes"
        );
    }

    #[test_case("2024", "2024.jun.codes" ; "numeric label")]
    #[test_case("api.v2", "api.v2.jun.codes" ; "dotted relative name")]
    fn test_relative_names_joined_to_zone(record_name: &str, expected: &str) {
        let (zone_name, _) = zone();
        assert_eq!(qualify(record_name, &zone_name).unwrap().as_str(), expected);
    }

    #[test]
    fn test_alias_record() {
        let mut stack = Stack::new(
            "TestStack",
            Environment::new("123456789012", "eu-west-2"),
            BTreeMap::new(),
        )
        .unwrap();
        let root = stack.root();
        let (zone_name, hosted_zone) = zone();
        let target = json!({
            "DNSName": get_att("Domain", "DistributionDomainName"),
            "HostedZoneId": get_att("Domain", "DistributionHostedZoneId"),
        });

        let record = ARecord::new(
            &mut stack,
            root,
            "ohw-server-api-record",
            RecordProps {
                record_name: "ohw-server",
                zone_name: &zone_name,
                hosted_zone: &hosted_zone,
                target: target.clone(),
            },
        )
        .unwrap();

        let resource = stack.template().resource(&record.logical_id).unwrap();
        assert_eq!(resource.properties["Name"], "ohw-server.jun.codes.");
        assert_eq!(resource.properties["Type"], "A");
        assert_eq!(resource.properties["HostedZoneId"], "Z0ABCDEF");
        assert_eq!(resource.properties["AliasTarget"]["DNSName"], target["DNSName"]);
        assert_eq!(resource.properties["AliasTarget"]["EvaluateTargetHealth"], false);
    }

    #[test]
    fn test_invalid_record_name() {
        let (zone_name, _) = zone();
        assert!(matches!(
            qualify("bad_name", &zone_name),
            Err(SynthError::DomainName(_))
        ));
    }
}
