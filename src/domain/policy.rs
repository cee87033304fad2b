// Copyright (c) 2025 - Cowboy AI, Inc.
//! Gateway and Function Policy Value Objects
//!
//! Fixed policy choices for the deployment: endpoint type, TLS policy, API
//! key source, function runtime and throttling limits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Region where edge-optimized endpoints require their certificate
pub const EDGE_CERTIFICATE_REGION: &str = "us-east-1";

/// API gateway endpoint type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndpointType {
    /// Fronted by the global content-delivery layer
    #[serde(rename = "EDGE")]
    Edge,
    /// Served from the stack's own region
    #[serde(rename = "REGIONAL")]
    Regional,
}

impl EndpointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edge => "EDGE",
            Self::Regional => "REGIONAL",
        }
    }

    /// Region the certificate must be issued in for this endpoint type
    pub fn certificate_region<'a>(&self, stack_region: &'a str) -> &'a str {
        match self {
            Self::Edge => EDGE_CERTIFICATE_REGION,
            Self::Regional => stack_region,
        }
    }

    /// Domain name property carrying the certificate ARN
    pub fn certificate_property(&self) -> &'static str {
        match self {
            Self::Edge => "CertificateArn",
            Self::Regional => "RegionalCertificateArn",
        }
    }

    /// Attributes of the domain resource an alias record must target
    ///
    /// Returns `(dns_name_attribute, hosted_zone_id_attribute)`.
    pub fn alias_attributes(&self) -> (&'static str, &'static str) {
        match self {
            Self::Edge => ("DistributionDomainName", "DistributionHostedZoneId"),
            Self::Regional => ("RegionalDomainName", "RegionalHostedZoneId"),
        }
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum TLS version accepted by the custom domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityPolicy {
    #[serde(rename = "TLS_1_2")]
    Tls12,
}

impl SecurityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tls12 => "TLS_1_2",
        }
    }
}

/// Where the gateway reads API keys from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiKeySource {
    #[serde(rename = "HEADER")]
    Header,
}

impl ApiKeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "HEADER",
        }
    }
}

/// Function runtime identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Runtime {
    /// Custom runtime on Amazon Linux 2 (executable named `bootstrap`)
    #[serde(rename = "provided.al2")]
    ProvidedAl2,
    /// Node.js 16, used by the certificate requestor
    #[serde(rename = "nodejs16.x")]
    Nodejs16,
}

impl Runtime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProvidedAl2 => "provided.al2",
            Self::Nodejs16 => "nodejs16.x",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage-wide request throttling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Throttling {
    /// Maximum concurrent burst of requests
    pub burst_limit: u32,
    /// Steady-state requests per second
    pub rate_limit: f64,
}

impl Throttling {
    pub fn new(burst_limit: u32, rate_limit: f64) -> Self {
        Self {
            burst_limit,
            rate_limit,
        }
    }
}

impl Default for Throttling {
    fn default() -> Self {
        Self::new(3, 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_certificate_region_is_fixed() {
        assert_eq!(EndpointType::Edge.certificate_region("eu-west-2"), "us-east-1");
        assert_eq!(EndpointType::Edge.certificate_region("ap-south-1"), "us-east-1");
        assert_eq!(EndpointType::Regional.certificate_region("eu-west-2"), "eu-west-2");
    }

    #[test]
    fn test_alias_attributes() {
        assert_eq!(
            EndpointType::Edge.alias_attributes(),
            ("DistributionDomainName", "DistributionHostedZoneId")
        );
        assert_eq!(EndpointType::Regional.certificate_property(), "RegionalCertificateArn");
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&SecurityPolicy::Tls12).unwrap(), "\"TLS_1_2\"");
        assert_eq!(serde_json::to_string(&Runtime::ProvidedAl2).unwrap(), "\"provided.al2\"");
        assert_eq!(ApiKeySource::Header.as_str(), "HEADER");
        assert_eq!(Runtime::Nodejs16.as_str(), "nodejs16.x");
    }
}
