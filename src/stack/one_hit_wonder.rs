// Copyright (c) 2025 - Cowboy AI, Inc.
//! The one-hit-wonder deployment stack
//!
//! ```text
//! zone lookup ──> certificate ──┐
//!                               ├──> gateway + custom domain ──> alias record
//! artifact ────> function ──────┘
//! ```

use tracing::{debug, info};

use super::Stack;
use crate::asset::Asset;
use crate::config::StackConfig;
use crate::domain::{invariants, ResourceKind, Throttling, ValidationError};
use crate::errors::SynthResult;
use crate::resources::{
    ARecord, CertificateProps, DnsValidatedCertificate, DomainProps, Function, FunctionCode,
    FunctionProps, GatewayProps, HostedZoneAttributes, HostedZoneProvider, HostedZoneQuery,
    LambdaRestApi, RecordProps,
};
use crate::template::intrinsic::referenced_logical_ids;
use crate::template::Template;

/// Construct ids of the certificate and the alias record
pub const CERTIFICATE_ID: &str = "ohw-certificate";
pub const RECORD_ID: &str = "ohw-server-api-record";

/// Function, gateway, certificate, custom domain and DNS record for the
/// ohw-server
#[derive(Debug, Clone)]
pub struct OneHitWonderStack {
    config: StackConfig,
    stack: Stack,
    asset: Asset,
    hosted_zone: HostedZoneAttributes,
    function: Function,
    certificate: DnsValidatedCertificate,
    gateway: LambdaRestApi,
    record: ARecord,
}

impl OneHitWonderStack {
    /// Compose the stack
    ///
    /// Fails before declaring anything when the configuration is invalid or
    /// the artifact is missing, and fails as a whole when the zone cannot
    /// be found or the composed stack breaks an invariant.
    pub fn new(config: StackConfig, zones: &dyn HostedZoneProvider) -> SynthResult<Self> {
        config.validate()?;
        let asset = Asset::fingerprint(&config.artifact_dir)?;

        let zone_name = config.zone()?;
        let domain_name = config.domain_name()?;

        let mut stack = Stack::new(&config.stack_id, config.env.clone(), config.tags.clone())?;
        let root = stack.root();

        let function = Function::new(
            &mut stack,
            root,
            &config.function_name,
            FunctionProps {
                function_name: Some(&config.function_name),
                handler: &config.handler,
                runtime: config.runtime,
                code: FunctionCode::Asset(asset.code_property(&config.env)?),
                timeout: None,
            },
        )?;

        let hosted_zone = zones.lookup(&HostedZoneQuery::new(&config.env, zone_name.clone())?)?;
        debug!(zone = %zone_name, zone_id = hosted_zone.zone_id(), "Hosted zone resolved");

        let certificate = DnsValidatedCertificate::new(
            &mut stack,
            root,
            CERTIFICATE_ID,
            CertificateProps {
                domain_name: &domain_name,
                hosted_zone: &hosted_zone,
                region: config.certificate_region(),
            },
        )?;

        let gateway = LambdaRestApi::new(
            &mut stack,
            root,
            &config.api_name,
            GatewayProps {
                handler: &function,
                domain: DomainProps {
                    domain_name: &domain_name,
                    certificate: &certificate,
                    security_policy: config.security_policy,
                    endpoint_type: config.endpoint_type,
                },
                api_key_source: config.api_key_source,
                stage_name: &config.stage_name,
                throttling: config.throttling,
            },
        )?;

        let record = ARecord::new(
            &mut stack,
            root,
            RECORD_ID,
            RecordProps {
                record_name: &config.subdomain,
                zone_name: &zone_name,
                hosted_zone: &hosted_zone,
                target: gateway.alias_target(),
            },
        )?;

        stack.apply_tags();

        let composed = Self {
            config,
            stack,
            asset,
            hosted_zone,
            function,
            certificate,
            gateway,
            record,
        };
        composed.validate()?;

        for (category, count) in composed.template().category_counts() {
            debug!(%category, count, "Declared resources");
        }
        info!(
            stack = composed.stack.id(),
            resources = composed.template().resources().count(),
            "Composed stack"
        );
        Ok(composed)
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn template(&self) -> &Template {
        self.stack.template()
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn hosted_zone(&self) -> &HostedZoneAttributes {
        &self.hosted_zone
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn certificate(&self) -> &DnsValidatedCertificate {
        &self.certificate
    }

    pub fn gateway(&self) -> &LambdaRestApi {
        &self.gateway
    }

    pub fn record(&self) -> &ARecord {
        &self.record
    }

    /// Recheck the stack invariants against the synthesized template
    pub fn validate(&self) -> SynthResult<()> {
        let template = self.template();
        let resource = |logical_id: &str| {
            template
                .resource(logical_id)
                .ok_or_else(|| ValidationError::MissingResource(logical_id.to_string()))
        };

        // Certificate placement
        let certificate = resource(&self.certificate.logical_id)?;
        let certificate_region = certificate
            .property("Region")
            .and_then(|region| region.as_str())
            .unwrap_or_default();
        invariants::validate_certificate_region(
            self.gateway.endpoint_type,
            &self.config.env.region,
            certificate_region,
        )?;
        invariants::validate_certificate_domain(
            &self.certificate.domain_name,
            &self.gateway.domain_name,
        )?;

        // The custom domain must use this certificate
        let domain = resource(&self.gateway.domain_id)?;
        let certificate_ref = domain
            .property(self.gateway.endpoint_type.certificate_property())
            .map(referenced_logical_ids)
            .unwrap_or_default();
        if certificate_ref != [self.certificate.logical_id.clone()] {
            return Err(ValidationError::MissingResource(format!(
                "certificate binding on {}",
                self.gateway.domain_id
            ))
            .into());
        }

        // The alias record must point at that same custom domain
        let record = resource(&self.record.logical_id)?;
        let alias_refs = record
            .property("AliasTarget")
            .map(referenced_logical_ids)
            .unwrap_or_default();
        invariants::validate_alias_target(&self.gateway.domain_id, &alias_refs)?;

        // Stage throttling
        let stage = resource(&self.gateway.stage_id)?;
        let settings = &stage.properties["MethodSettings"][0];
        let throttling = Throttling::new(
            settings["ThrottlingBurstLimit"]
                .as_u64()
                .and_then(|burst| u32::try_from(burst).ok())
                .unwrap_or(0),
            settings["ThrottlingRateLimit"].as_f64().unwrap_or(0.0),
        );
        invariants::validate_throttling(&throttling)?;

        // Exactly one function carries the configured name
        let named = template
            .resources_of_kind(ResourceKind::LambdaFunction)
            .into_iter()
            .filter(|(_, function)| {
                function.property("FunctionName").and_then(|name| name.as_str())
                    == Some(self.config.function_name.as_str())
            })
            .count();
        if named != 1 {
            return Err(ValidationError::MissingResource(format!(
                "function {} (found {named})",
                self.config.function_name
            ))
            .into());
        }

        Ok(())
    }
}
