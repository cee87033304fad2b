// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack configuration
//!
//! The deployment target is fixed: every name, domain and limit below is a
//! constant of the one production deployment. Only the account and the
//! filesystem locations come from the environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::{
    invariants, ApiKeySource, DomainName, EndpointType, Runtime, SecurityPolicy, Throttling,
};
use crate::errors::{SynthError, SynthResult};

/// Target account and region of a stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Account id, unresolved when `None`
    pub account: Option<String>,
    /// Deployment region
    pub region: String,
}

impl Environment {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
            region: region.into(),
        }
    }

    /// Account id, or a configuration error when none was provided
    ///
    /// Lookups and asset destinations need a concrete account.
    pub fn require_account(&self) -> SynthResult<&str> {
        self.account.as_deref().ok_or_else(|| {
            SynthError::Configuration(
                "account is not set; export CDK_DEFAULT_ACCOUNT".to_string(),
            )
        })
    }

    /// `aws://<account>/<region>` form used in the assembly manifest
    pub fn to_uri(&self) -> String {
        format!(
            "aws://{}/{}",
            self.account.as_deref().unwrap_or("unknown-account"),
            self.region
        )
    }
}

/// Configuration of the one-hit-wonder deployment stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Stack (and construct tree root) id
    pub stack_id: String,

    /// Target account and region
    pub env: Environment,

    /// Tags attached to every taggable resource
    pub tags: BTreeMap<String, String>,

    /// Hosted zone the record and certificate validation live in
    pub zone_name: String,

    /// Label prepended to the zone to form the public hostname
    pub subdomain: String,

    /// Physical name of the function
    pub function_name: String,

    /// Entry point exposed by the artifact
    pub handler: String,

    /// Function runtime
    pub runtime: Runtime,

    /// Directory holding the prebuilt function artifact
    pub artifact_dir: PathBuf,

    /// Physical name of the REST API
    pub api_name: String,

    /// Gateway endpoint type
    pub endpoint_type: EndpointType,

    /// Minimum TLS policy for the custom domain
    pub security_policy: SecurityPolicy,

    /// API key source
    pub api_key_source: ApiKeySource,

    /// Stage throttling
    pub throttling: Throttling,

    /// Stage name
    pub stage_name: String,

    /// Cloud assembly output directory
    pub out_dir: PathBuf,

    /// Lookup cache consulted for hosted zones
    pub context_file: PathBuf,

    /// Inline lookup context; takes precedence over `context_file`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_json: Option<String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            stack_id: "OneHitWonderStack".to_string(),
            env: Environment {
                account: None,
                region: "eu-west-2".to_string(),
            },
            tags: BTreeMap::from([("project".to_string(), "ohw".to_string())]),
            zone_name: "jun.codes".to_string(),
            subdomain: "ohw-server".to_string(),
            function_name: "ohw-server-handler".to_string(),
            handler: "main".to_string(),
            runtime: Runtime::ProvidedAl2,
            artifact_dir: PathBuf::from("../ohw-server/target/lambda/ohw-server"),
            api_name: "ohw-api".to_string(),
            endpoint_type: EndpointType::Edge,
            security_policy: SecurityPolicy::Tls12,
            api_key_source: ApiKeySource::Header,
            throttling: Throttling::default(),
            stage_name: "prod".to_string(),
            out_dir: PathBuf::from("cdk.out"),
            context_file: PathBuf::from("cdk.context.json"),
            context_json: None,
        }
    }
}

impl StackConfig {
    /// Load the fixed configuration, taking the account and paths from the
    /// environment
    ///
    /// - `CDK_DEFAULT_ACCOUNT`: target account
    /// - `CDK_OUTDIR`: assembly output directory (default `cdk.out`)
    /// - `CDK_CONTEXT_JSON`: inline lookup context passed by the deployment tool
    /// - `CDK_CONTEXT_FILE`: lookup cache used when no inline context is set
    ///   (default `cdk.context.json`)
    /// - `OHW_ARTIFACT_DIR`: function artifact directory override
    ///
    /// The region is fixed and never read from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.env.account = std::env::var("CDK_DEFAULT_ACCOUNT")
            .ok()
            .filter(|account| !account.is_empty());

        if let Ok(out_dir) = std::env::var("CDK_OUTDIR") {
            config.out_dir = PathBuf::from(out_dir);
        }
        config.context_json = std::env::var("CDK_CONTEXT_JSON")
            .ok()
            .filter(|context| !context.trim().is_empty());
        if let Ok(context_file) = std::env::var("CDK_CONTEXT_FILE") {
            config.context_file = PathBuf::from(context_file);
        }
        if let Ok(artifact_dir) = std::env::var("OHW_ARTIFACT_DIR") {
            config.artifact_dir = PathBuf::from(artifact_dir);
        }

        config
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.env.account = Some(account.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.env.region = region.into();
        self
    }

    pub fn with_artifact_dir(mut self, artifact_dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = artifact_dir.into();
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn with_context_file(mut self, context_file: impl Into<PathBuf>) -> Self {
        self.context_file = context_file.into();
        self
    }

    pub fn with_context_json(mut self, context_json: impl Into<String>) -> Self {
        self.context_json = Some(context_json.into());
        self
    }

    pub fn with_endpoint_type(mut self, endpoint_type: EndpointType) -> Self {
        self.endpoint_type = endpoint_type;
        self
    }

    pub fn with_throttling(mut self, throttling: Throttling) -> Self {
        self.throttling = throttling;
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Hosted zone name
    pub fn zone(&self) -> SynthResult<DomainName> {
        Ok(DomainName::new(self.zone_name.as_str())?)
    }

    /// Public hostname served by the gateway, e.g. `ohw-server.jun.codes`
    pub fn domain_name(&self) -> SynthResult<DomainName> {
        Ok(self.zone()?.subdomain(&self.subdomain)?)
    }

    /// Region the certificate is issued in
    pub fn certificate_region(&self) -> &str {
        self.endpoint_type.certificate_region(&self.env.region)
    }

    /// Check the configuration is usable before composing anything
    pub fn validate(&self) -> SynthResult<()> {
        let required = [
            ("stack_id", &self.stack_id),
            ("region", &self.env.region),
            ("function_name", &self.function_name),
            ("handler", &self.handler),
            ("api_name", &self.api_name),
            ("stage_name", &self.stage_name),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(SynthError::Configuration(format!("{field} cannot be empty")));
        }

        let zone = self.zone()?;
        let domain = self.domain_name()?;
        invariants::validate_record_in_zone(&domain, &zone)?;
        invariants::validate_throttling(&self.throttling)?;

        Ok(())
    }
}
