// Copyright (c) 2025 - Cowboy AI, Inc.
//! Lambda-backed REST API
//!
//! Every method on every path is proxied to one function:
//!
//! ```text
//! /            ANY ──┐
//! /{proxy+}    ANY ──┴──> AWS_PROXY integration ──> function
//! ```
//!
//! The API is published through one stage (with stage-wide throttling) and
//! mapped onto a custom domain secured by the certificate.

use serde_json::{json, Value};
use tracing::info;

use super::certificate::DnsValidatedCertificate;
use super::function::Function;
use super::iam::{ServiceRole, API_GATEWAY_PUSH_TO_CLOUDWATCH};
use crate::construct::NodeId;
use crate::domain::{ApiKeySource, DomainName, EndpointType, ResourceKind, SecurityPolicy, Throttling};
use crate::errors::SynthResult;
use crate::stack::Stack;
use crate::template::intrinsic::{get_att, join, reference, ACCOUNT_ID, PARTITION, REGION, URL_SUFFIX};
use crate::template::{Output, Resource};

const APIGATEWAY_PRINCIPAL: &str = "apigateway.amazonaws.com";
const TEST_INVOKE_STAGE: &str = "test-invoke-stage";

/// Custom domain settings
#[derive(Debug, Clone)]
pub struct DomainProps<'a> {
    pub domain_name: &'a DomainName,
    pub certificate: &'a DnsValidatedCertificate,
    pub security_policy: SecurityPolicy,
    pub endpoint_type: EndpointType,
}

/// Properties of a [`LambdaRestApi`]
#[derive(Debug, Clone)]
pub struct GatewayProps<'a> {
    pub handler: &'a Function,
    pub domain: DomainProps<'a>,
    pub api_key_source: ApiKeySource,
    pub stage_name: &'a str,
    pub throttling: Throttling,
}

/// A declared REST API with its custom domain
#[derive(Debug, Clone)]
pub struct LambdaRestApi {
    pub rest_api_id: String,
    pub deployment_id: String,
    pub stage_id: String,
    pub domain_id: String,
    pub domain_name: DomainName,
    pub endpoint_type: EndpointType,
    pub endpoint_output_id: String,
}

struct ProxyMethod {
    scope: NodeId,
    logical_id: String,
    /// Path used in execute-api ARNs: `/*` for the proxy, `/` for the root
    arn_path: &'static str,
}

impl LambdaRestApi {
    pub fn new(
        stack: &mut Stack,
        parent: NodeId,
        id: &str,
        props: GatewayProps<'_>,
    ) -> SynthResult<Self> {
        let scope = stack.scope(parent, id)?;

        let rest_api_id = stack.declare(
            scope,
            "Resource",
            Resource::new(
                ResourceKind::RestApi,
                json!({
                    "Name": id,
                    "ApiKeySourceType": props.api_key_source.as_str(),
                }),
            ),
        )?;

        // Account-wide logging role for the gateway service
        let cloudwatch_role = ServiceRole::new(
            stack,
            scope,
            "CloudWatchRole",
            APIGATEWAY_PRINCIPAL,
            &[API_GATEWAY_PUSH_TO_CLOUDWATCH],
        )?;
        let account_id = stack.declare(
            scope,
            "Account",
            Resource::new(
                ResourceKind::ApiAccount,
                json!({ "CloudWatchRoleArn": cloudwatch_role.arn() }),
            )
            .depends_on(rest_api_id.clone()),
        )?;

        let methods = Self::declare_proxy_methods(stack, scope, &rest_api_id, props.handler)?;

        // Deployment is renamed whenever the method surface changes.
        let mut fingerprint: Vec<Value> = Vec::new();
        let mut deployment = Resource::new(
            ResourceKind::ApiDeployment,
            json!({
                "RestApiId": reference(&rest_api_id),
                "Description": "Automatically created by the RestApi construct",
            }),
        );
        for method in &methods {
            if let Some(resource) = stack.template().resource(&method.logical_id) {
                fingerprint.push(serde_json::to_value(resource)?);
            }
            deployment = deployment.depends_on(method.logical_id.clone());
        }
        let deployment_id =
            stack.declare_versioned(scope, "Deployment", deployment, &Value::Array(fingerprint))?;

        let stage_id = stack.declare(
            scope,
            &format!("DeploymentStage.{}", props.stage_name),
            Resource::new(
                ResourceKind::ApiStage,
                json!({
                    "RestApiId": reference(&rest_api_id),
                    "DeploymentId": reference(&deployment_id),
                    "StageName": props.stage_name,
                    "MethodSettings": [{
                        "DataTraceEnabled": false,
                        "HttpMethod": "*",
                        "ResourcePath": "/*",
                        "ThrottlingBurstLimit": props.throttling.burst_limit,
                        "ThrottlingRateLimit": props.throttling.rate_limit,
                    }],
                }),
            )
            .depends_on(account_id),
        )?;

        for method in &methods {
            for (permission, stage) in [
                ("ApiPermission.ANY", reference(&stage_id)),
                ("ApiPermission.Test.ANY", json!(TEST_INVOKE_STAGE)),
            ] {
                let source_arn = execute_api_arn(&rest_api_id, stage, method.arn_path);
                props.handler.grant_invoke(
                    stack,
                    method.scope,
                    permission,
                    APIGATEWAY_PRINCIPAL,
                    source_arn,
                )?;
            }
        }

        let (domain_id, endpoint_type) =
            Self::declare_custom_domain(stack, scope, &rest_api_id, &stage_id, &props.domain)?;

        let endpoint_output_id = stack.output(
            scope,
            "Endpoint",
            Output {
                description: None,
                value: join(
                    "",
                    vec![
                        json!("https://"),
                        reference(&rest_api_id),
                        json!(".execute-api."),
                        reference(REGION),
                        json!("."),
                        reference(URL_SUFFIX),
                        json!("/"),
                        reference(&stage_id),
                        json!("/"),
                    ],
                ),
            },
        )?;

        info!(
            api = id,
            domain = %props.domain.domain_name,
            endpoint = %endpoint_type,
            "Declared REST API"
        );

        Ok(Self {
            rest_api_id,
            deployment_id,
            stage_id,
            domain_id,
            domain_name: props.domain.domain_name.clone(),
            endpoint_type,
            endpoint_output_id,
        })
    }

    fn declare_proxy_methods(
        stack: &mut Stack,
        scope: NodeId,
        rest_api_id: &str,
        handler: &Function,
    ) -> SynthResult<Vec<ProxyMethod>> {
        let integration = json!({
            "IntegrationHttpMethod": "POST",
            "Type": "AWS_PROXY",
            "Uri": join(
                "",
                vec![
                    json!("arn:"),
                    reference(PARTITION),
                    json!(":apigateway:"),
                    reference(REGION),
                    json!(":lambda:path/2015-03-31/functions/"),
                    handler.arn(),
                    json!("/invocations"),
                ],
            ),
        });

        let root = stack.scope(scope, "Default")?;
        let proxy = stack.scope(root, "{proxy+}")?;
        let proxy_resource_id = stack.declare(
            proxy,
            "Resource",
            Resource::new(
                ResourceKind::ApiResource,
                json!({
                    "ParentId": get_att(rest_api_id, "RootResourceId"),
                    "PathPart": "{proxy+}",
                    "RestApiId": reference(rest_api_id),
                }),
            ),
        )?;

        let mut methods = Vec::new();
        for (parent, resource_id, arn_path) in [
            (proxy, reference(&proxy_resource_id), "/*"),
            (root, get_att(rest_api_id, "RootResourceId"), "/"),
        ] {
            let method_scope = stack.scope(parent, "ANY")?;
            let logical_id = stack.declare(
                method_scope,
                "Resource",
                Resource::new(
                    ResourceKind::ApiMethod,
                    json!({
                        "HttpMethod": "ANY",
                        "ResourceId": resource_id,
                        "RestApiId": reference(rest_api_id),
                        "AuthorizationType": "NONE",
                        "Integration": integration.clone(),
                    }),
                ),
            )?;
            methods.push(ProxyMethod {
                scope: method_scope,
                logical_id,
                arn_path,
            });
        }

        Ok(methods)
    }

    fn declare_custom_domain(
        stack: &mut Stack,
        scope: NodeId,
        rest_api_id: &str,
        stage_id: &str,
        domain: &DomainProps<'_>,
    ) -> SynthResult<(String, EndpointType)> {
        let domain_scope = stack.scope(scope, "CustomDomain")?;

        let mut properties = json!({
            "DomainName": domain.domain_name.as_str(),
            "EndpointConfiguration": { "Types": [domain.endpoint_type.as_str()] },
            "SecurityPolicy": domain.security_policy.as_str(),
        });
        properties[domain.endpoint_type.certificate_property()] = domain.certificate.arn();

        let domain_id = stack.declare(
            domain_scope,
            "Resource",
            Resource::new(ResourceKind::ApiDomainName, properties),
        )?;

        let mapping_id = format!("Map:--=>{}", stack.tree().logical_id(scope));
        stack.declare(
            domain_scope,
            &mapping_id,
            Resource::new(
                ResourceKind::ApiBasePathMapping,
                json!({
                    "DomainName": reference(&domain_id),
                    "RestApiId": reference(rest_api_id),
                    "Stage": reference(stage_id),
                }),
            ),
        )?;

        Ok((domain_id, domain.endpoint_type))
    }

    /// Alias target of the custom domain, for DNS records
    pub fn alias_target(&self) -> Value {
        let (dns_name, hosted_zone_id) = self.endpoint_type.alias_attributes();
        json!({
            "DNSName": get_att(&self.domain_id, dns_name),
            "HostedZoneId": get_att(&self.domain_id, hosted_zone_id),
        })
    }
}

/// `arn:<partition>:execute-api:<region>:<account>:<api>/<stage>/*<path>`
fn execute_api_arn(rest_api_id: &str, stage: Value, path: &str) -> Value {
    join(
        "",
        vec![
            json!("arn:"),
            reference(PARTITION),
            json!(":execute-api:"),
            reference(REGION),
            json!(":"),
            reference(ACCOUNT_ID),
            json!(":"),
            reference(rest_api_id),
            json!("/"),
            stage,
            json!(format!("/*{path}")),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::resources::certificate::CertificateProps;
    use crate::resources::function::{FunctionCode, FunctionProps};
    use crate::resources::hosted_zone::HostedZoneAttributes;
    use crate::domain::Runtime;
    use std::collections::BTreeMap;

    fn declare(endpoint_type: EndpointType) -> (Stack, LambdaRestApi) {
        let mut stack = Stack::new(
            "TestStack",
            Environment::new("123456789012", "eu-west-2"),
            BTreeMap::new(),
        )
        .unwrap();
        let root = stack.root();
        let handler = Function::new(
            &mut stack,
            root,
            "handler",
            FunctionProps {
                function_name: Some("handler"),
                handler: "main",
                runtime: Runtime::ProvidedAl2,
                code: FunctionCode::Asset(json!({ "S3Bucket": "b", "S3Key": "k.zip" })),
                timeout: None,
            },
        )
        .unwrap();
        let domain = DomainName::new("ohw-server.jun.codes").unwrap();
        let zone = HostedZoneAttributes {
            id: "Z0ABCDEF".to_string(),
            name: "jun.codes.".to_string(),
        };
        let certificate = DnsValidatedCertificate::new(
            &mut stack,
            root,
            "certificate",
            CertificateProps {
                domain_name: &domain,
                hosted_zone: &zone,
                region: endpoint_type.certificate_region("eu-west-2"),
            },
        )
        .unwrap();
        let api = LambdaRestApi::new(
            &mut stack,
            root,
            "ohw-api",
            GatewayProps {
                handler: &handler,
                domain: DomainProps {
                    domain_name: &domain,
                    certificate: &certificate,
                    security_policy: SecurityPolicy::Tls12,
                    endpoint_type,
                },
                api_key_source: ApiKeySource::Header,
                stage_name: "prod",
                throttling: Throttling::new(3, 3.0),
            },
        )
        .unwrap();
        (stack, api)
    }

    #[test]
    fn test_rest_api_and_stage() {
        let (stack, api) = declare(EndpointType::Edge);
        let template = stack.template();

        let rest_api = template.resource(&api.rest_api_id).unwrap();
        assert_eq!(rest_api.properties["Name"], "ohw-api");
        assert_eq!(rest_api.properties["ApiKeySourceType"], "HEADER");

        let stage = template.resource(&api.stage_id).unwrap();
        assert_eq!(stage.properties["StageName"], "prod");
        assert_eq!(stage.properties["DeploymentId"], reference(&api.deployment_id));
        let settings = &stage.properties["MethodSettings"][0];
        assert_eq!(settings["ThrottlingBurstLimit"], 3);
        assert_eq!(settings["ThrottlingRateLimit"], 3.0);
    }

    #[test]
    fn test_every_method_proxied() {
        let (stack, api) = declare(EndpointType::Edge);
        let template = stack.template();

        let methods = template.resources_of_kind(ResourceKind::ApiMethod);
        assert_eq!(methods.len(), 2);
        for (_, method) in &methods {
            assert_eq!(method.properties["HttpMethod"], "ANY");
            assert_eq!(method.properties["Integration"]["Type"], "AWS_PROXY");
        }

        let deployment = template.resource(&api.deployment_id).unwrap();
        for (id, _) in &methods {
            assert!(deployment.depends_on.contains(*id));
        }

        // Stage and test-invoke permission per method
        assert_eq!(template.resources_of_kind(ResourceKind::LambdaPermission).len(), 4);
    }

    #[test]
    fn test_edge_domain() {
        let (stack, api) = declare(EndpointType::Edge);
        let domain = stack.template().resource(&api.domain_id).unwrap();

        assert_eq!(domain.properties["DomainName"], "ohw-server.jun.codes");
        assert_eq!(domain.properties["EndpointConfiguration"]["Types"], json!(["EDGE"]));
        assert_eq!(domain.properties["SecurityPolicy"], "TLS_1_2");
        assert!(domain.properties.contains_key("CertificateArn"));
        assert!(!domain.properties.contains_key("RegionalCertificateArn"));

        let target = api.alias_target();
        assert_eq!(target["DNSName"], get_att(&api.domain_id, "DistributionDomainName"));
    }

    #[test]
    fn test_regional_domain() {
        let (stack, api) = declare(EndpointType::Regional);
        let domain = stack.template().resource(&api.domain_id).unwrap();
        assert!(domain.properties.contains_key("RegionalCertificateArn"));
        assert_eq!(
            api.alias_target()["HostedZoneId"],
            get_att(&api.domain_id, "RegionalHostedZoneId")
        );
    }

    #[test]
    fn test_base_path_mapping_and_output() {
        let (stack, api) = declare(EndpointType::Edge);
        let template = stack.template();

        let mappings = template.resources_of_kind(ResourceKind::ApiBasePathMapping);
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].1.properties["DomainName"], reference(&api.domain_id));
        assert_eq!(mappings[0].1.properties["Stage"], reference(&api.stage_id));

        assert!(template.outputs().any(|(id, _)| id == api.endpoint_output_id));
    }
}
