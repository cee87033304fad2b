// Copyright (c) 2025 - Cowboy AI, Inc.
//! DNS-Validated Certificate
//!
//! Edge-optimized endpoints need their certificate in a fixed region, which
//! can differ from the stack's own region. A plain certificate resource is
//! always created in the stack region, so issuance goes through a requestor
//! function instead. It requests the certificate in the target region,
//! upserts the validation record into the hosted zone, and waits for
//! validation before reporting the ARN back.

use serde_json::{json, Value};
use tracing::info;

use super::function::{Function, FunctionCode, FunctionProps};
use super::hosted_zone::HostedZoneAttributes;
use super::iam::allow;
use crate::construct::NodeId;
use crate::domain::{DomainName, ResourceKind, Runtime};
use crate::errors::SynthResult;
use crate::stack::Stack;
use crate::template::intrinsic::{get_att, join, reference, PARTITION};
use crate::template::Resource;

/// Handler source of the requestor function
pub const REQUESTOR_SOURCE: &str = include_str!("certificate_requestor.js");

/// Validation can take a while; use the provider's maximum timeout
const REQUESTOR_TIMEOUT_SECS: u32 = 900;

/// Properties of a [`DnsValidatedCertificate`]
#[derive(Debug, Clone)]
pub struct CertificateProps<'a> {
    pub domain_name: &'a DomainName,
    pub hosted_zone: &'a HostedZoneAttributes,
    /// Region the certificate is issued in
    pub region: &'a str,
}

/// A declared certificate
#[derive(Debug, Clone)]
pub struct DnsValidatedCertificate {
    pub logical_id: String,
    pub domain_name: DomainName,
    pub region: String,
    pub requestor: Function,
}

impl DnsValidatedCertificate {
    pub fn new(
        stack: &mut Stack,
        parent: NodeId,
        id: &str,
        props: CertificateProps<'_>,
    ) -> SynthResult<Self> {
        let scope = stack.scope(parent, id)?;

        let requestor = Function::new(
            stack,
            scope,
            "CertificateRequestorFunction",
            FunctionProps {
                function_name: None,
                handler: "index.certificateRequestHandler",
                runtime: Runtime::Nodejs16,
                code: FunctionCode::Inline(REQUESTOR_SOURCE),
                timeout: Some(REQUESTOR_TIMEOUT_SECS),
            },
        )?;

        let zone_arn = join(
            "",
            vec![
                json!("arn:"),
                reference(PARTITION),
                json!(format!(":route53:::hostedzone/{}", props.hosted_zone.zone_id())),
            ],
        );
        let policy_id = requestor.role.add_default_policy(
            stack,
            vec![
                allow(
                    &[
                        "acm:AddTagsToCertificate",
                        "acm:DeleteCertificate",
                        "acm:DescribeCertificate",
                        "acm:RequestCertificate",
                    ],
                    json!("*"),
                ),
                allow(&["route53:GetChange"], json!("*")),
                allow(&["route53:changeResourceRecordSets"], zone_arn),
            ],
        )?;

        let resource_scope = stack.scope(scope, "CertificateRequestorResource")?;
        let logical_id = stack.declare(
            resource_scope,
            "Default",
            Resource::new(
                ResourceKind::DnsValidatedCertificate,
                json!({
                    "ServiceToken": requestor.arn(),
                    "DomainName": props.domain_name.as_str(),
                    "HostedZoneId": props.hosted_zone.zone_id(),
                    "Region": props.region,
                }),
            )
            .depends_on(policy_id),
        )?;

        info!(domain = %props.domain_name, region = props.region, "Declared DNS-validated certificate");
        Ok(Self {
            logical_id,
            domain_name: props.domain_name.clone(),
            region: props.region.to_string(),
            requestor,
        })
    }

    /// ARN reported by the requestor once the certificate is validated
    pub fn arn(&self) -> Value {
        get_att(&self.logical_id, "Arn")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use std::collections::BTreeMap;

    fn declare() -> (Stack, DnsValidatedCertificate) {
        let mut stack = Stack::new(
            "TestStack",
            Environment::new("123456789012", "eu-west-2"),
            BTreeMap::new(),
        )
        .unwrap();
        let root = stack.root();
        let domain = DomainName::new("ohw-server.jun.codes").unwrap();
        let zone = HostedZoneAttributes {
            id: "/hostedzone/Z0ABCDEF".to_string(),
            name: "jun.codes.".to_string(),
        };
        let certificate = DnsValidatedCertificate::new(
            &mut stack,
            root,
            "ohw-certificate",
            CertificateProps {
                domain_name: &domain,
                hosted_zone: &zone,
                region: "us-east-1",
            },
        )
        .unwrap();
        (stack, certificate)
    }

    #[test]
    fn test_custom_resource_properties() {
        let (stack, certificate) = declare();
        let resource = stack.template().resource(&certificate.logical_id).unwrap();

        assert_eq!(resource.kind, ResourceKind::DnsValidatedCertificate);
        assert_eq!(resource.properties["DomainName"], "ohw-server.jun.codes");
        assert_eq!(resource.properties["HostedZoneId"], "Z0ABCDEF");
        assert_eq!(resource.properties["Region"], "us-east-1");
        assert_eq!(resource.properties["ServiceToken"], certificate.requestor.arn());
        assert_eq!(certificate.region, "us-east-1");
    }

    #[test]
    fn test_requestor_scoped_to_zone() {
        let (stack, _) = declare();
        let policies = stack.template().resources_of_kind(ResourceKind::IamPolicy);
        assert_eq!(policies.len(), 1);

        let statements = &policies[0].1.properties["PolicyDocument"]["Statement"];
        let zone_statement = statements
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["Action"] == "route53:changeResourceRecordSets")
            .unwrap();
        assert_eq!(
            zone_statement["Resource"]["Fn::Join"][1][2],
            ":route53:::hostedzone/Z0ABCDEF"
        );
    }

    #[test]
    fn test_requestor_source_fits_inline_limit() {
        assert!(REQUESTOR_SOURCE.len() < 4096);
        assert!(REQUESTOR_SOURCE.contains("exports.certificateRequestHandler"));
    }
}
