// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Kind Domain Model
//!
//! The taxonomy of CloudFormation resource types the stack can emit. Each
//! kind knows its provider type name, the high-level category it belongs to,
//! and whether it accepts stack tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CloudFormation resource type taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    // Compute
    /// Lambda function
    LambdaFunction,
    /// Resource policy granting an invoker access to a function
    LambdaPermission,

    // Identity
    /// IAM role
    IamRole,
    /// Inline IAM policy attached to a role
    IamPolicy,

    // Gateway
    /// REST API
    RestApi,
    /// Path segment of a REST API
    ApiResource,
    /// HTTP method bound to a path
    ApiMethod,
    /// Immutable snapshot of a REST API
    ApiDeployment,
    /// Named stage pointing at a deployment
    ApiStage,
    /// Account-level gateway settings (CloudWatch role)
    ApiAccount,
    /// Custom domain for a gateway
    ApiDomainName,
    /// Mapping from a custom domain to an API stage
    ApiBasePathMapping,

    // Security
    /// DNS-validated certificate issued through a requestor function
    DnsValidatedCertificate,

    // DNS
    /// Route 53 record set
    RecordSet,
}

impl ResourceKind {
    /// CloudFormation type name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LambdaFunction => "AWS::Lambda::Function",
            Self::LambdaPermission => "AWS::Lambda::Permission",
            Self::IamRole => "AWS::IAM::Role",
            Self::IamPolicy => "AWS::IAM::Policy",
            Self::RestApi => "AWS::ApiGateway::RestApi",
            Self::ApiResource => "AWS::ApiGateway::Resource",
            Self::ApiMethod => "AWS::ApiGateway::Method",
            Self::ApiDeployment => "AWS::ApiGateway::Deployment",
            Self::ApiStage => "AWS::ApiGateway::Stage",
            Self::ApiAccount => "AWS::ApiGateway::Account",
            Self::ApiDomainName => "AWS::ApiGateway::DomainName",
            Self::ApiBasePathMapping => "AWS::ApiGateway::BasePathMapping",
            Self::DnsValidatedCertificate => "AWS::CloudFormation::CustomResource",
            Self::RecordSet => "AWS::Route53::RecordSet",
        }
    }

    /// Type name written into templates
    ///
    /// Custom resources carry their own `Custom::` name instead of the
    /// generic CloudFormation type.
    pub fn template_type(&self) -> &'static str {
        match self {
            Self::DnsValidatedCertificate => "Custom::DnsValidatedCertificate",
            other => other.as_str(),
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LambdaFunction => "Lambda Function",
            Self::LambdaPermission => "Lambda Permission",
            Self::IamRole => "IAM Role",
            Self::IamPolicy => "IAM Policy",
            Self::RestApi => "REST API",
            Self::ApiResource => "API Resource",
            Self::ApiMethod => "API Method",
            Self::ApiDeployment => "API Deployment",
            Self::ApiStage => "API Stage",
            Self::ApiAccount => "API Gateway Account",
            Self::ApiDomainName => "API Custom Domain",
            Self::ApiBasePathMapping => "API Base Path Mapping",
            Self::DnsValidatedCertificate => "DNS-Validated Certificate",
            Self::RecordSet => "DNS Record Set",
        }
    }

    /// Get the primary category for this kind
    pub fn category(&self) -> ResourceCategory {
        match self {
            Self::LambdaFunction | Self::LambdaPermission => ResourceCategory::Compute,

            Self::IamRole | Self::IamPolicy => ResourceCategory::Identity,

            Self::RestApi
            | Self::ApiResource
            | Self::ApiMethod
            | Self::ApiDeployment
            | Self::ApiStage
            | Self::ApiAccount
            | Self::ApiDomainName
            | Self::ApiBasePathMapping => ResourceCategory::Gateway,

            Self::DnsValidatedCertificate => ResourceCategory::Security,

            Self::RecordSet => ResourceCategory::Dns,
        }
    }

    /// Whether the provider accepts a `Tags` list on this type
    pub fn is_taggable(&self) -> bool {
        matches!(
            self,
            Self::LambdaFunction
                | Self::IamRole
                | Self::RestApi
                | Self::ApiStage
                | Self::ApiDomainName
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Resource category (high-level grouping)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceCategory {
    /// Functions and their invocation grants
    Compute,
    /// Roles and policies
    Identity,
    /// API gateway front door
    Gateway,
    /// Certificates
    Security,
    /// DNS records
    Dns,
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compute => write!(f, "Compute"),
            Self::Identity => write!(f, "Identity"),
            Self::Gateway => write!(f, "Gateway"),
            Self::Security => write!(f, "Security"),
            Self::Dns => write!(f, "DNS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_resource_type() {
        let kind = ResourceKind::DnsValidatedCertificate;
        assert_eq!(kind.as_str(), "AWS::CloudFormation::CustomResource");
        assert_eq!(kind.template_type(), "Custom::DnsValidatedCertificate");
    }

    #[test]
    fn test_categories() {
        assert_eq!(ResourceKind::LambdaFunction.category(), ResourceCategory::Compute);
        assert_eq!(ResourceKind::ApiDomainName.category(), ResourceCategory::Gateway);
        assert_eq!(ResourceKind::RecordSet.category(), ResourceCategory::Dns);
        assert_eq!(ResourceKind::IamPolicy.category(), ResourceCategory::Identity);
    }

    #[test]
    fn test_taggable() {
        assert!(ResourceKind::LambdaFunction.is_taggable());
        assert!(ResourceKind::ApiStage.is_taggable());
        assert!(!ResourceKind::RecordSet.is_taggable());
        assert!(!ResourceKind::DnsValidatedCertificate.is_taggable());
    }
}
