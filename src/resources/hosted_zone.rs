// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hosted Zone Lookup
//!
//! The zone is owned outside this stack. Synthesis only reads its id from a
//! [`HostedZoneProvider`]; the stack adds one record to it and never
//! mutates anything else.
//!
//! [`ContextFile`] reads the lookup context the deployment tool maintains,
//! either passed inline (`CDK_CONTEXT_JSON`) or cached on disk
//! (`cdk.context.json`), keyed like
//! `hosted-zone:account=123456789012:domainName=jun.codes:region=eu-west-2`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::Environment;
use crate::domain::DomainName;
use crate::errors::{SynthError, SynthResult};

/// What to look up: a zone by name in one account and region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZoneQuery {
    pub account: String,
    pub region: String,
    pub domain_name: DomainName,
}

impl HostedZoneQuery {
    pub fn new(env: &Environment, domain_name: DomainName) -> SynthResult<Self> {
        Ok(Self {
            account: env.require_account()?.to_string(),
            region: env.region.clone(),
            domain_name,
        })
    }

    /// Key of this query in the lookup cache
    pub fn context_key(&self) -> String {
        format!(
            "hosted-zone:account={}:domainName={}:region={}",
            self.account, self.domain_name, self.region
        )
    }

    fn not_found(&self) -> SynthError {
        SynthError::HostedZoneNotFound {
            domain: self.domain_name.to_string(),
            account: self.account.clone(),
            region: self.region.clone(),
        }
    }
}

/// Resolved zone attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZoneAttributes {
    /// Zone id, with or without the `/hostedzone/` prefix
    #[serde(rename = "Id")]
    pub id: String,
    /// Zone name, usually absolute (`jun.codes.`)
    #[serde(rename = "Name")]
    pub name: String,
}

impl HostedZoneAttributes {
    /// Bare zone id (`Z0123456789ABC`)
    pub fn zone_id(&self) -> &str {
        self.id.strip_prefix("/hostedzone/").unwrap_or(&self.id)
    }
}

/// Source of hosted zone lookups
pub trait HostedZoneProvider {
    /// Resolve a zone; a missing zone is fatal for synthesis
    fn lookup(&self, query: &HostedZoneQuery) -> SynthResult<HostedZoneAttributes>;
}

/// In-memory zones, keyed by zone name
#[derive(Debug, Clone, Default)]
pub struct StaticZones {
    zones: BTreeMap<DomainName, String>,
}

impl StaticZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, name: DomainName, id: impl Into<String>) -> Self {
        self.zones.insert(name, id.into());
        self
    }
}

impl HostedZoneProvider for StaticZones {
    fn lookup(&self, query: &HostedZoneQuery) -> SynthResult<HostedZoneAttributes> {
        self.zones
            .get(&query.domain_name)
            .map(|id| HostedZoneAttributes {
                id: id.clone(),
                name: query.domain_name.to_absolute(),
            })
            .ok_or_else(|| query.not_found())
    }
}

/// Lookups served from the deployment tool's context
#[derive(Debug, Clone)]
pub struct ContextFile {
    entries: BTreeMap<String, Value>,
}

impl ContextFile {
    /// Inline context when given, otherwise the cache file at `path`
    pub fn resolve(inline: Option<&str>, path: impl AsRef<Path>) -> SynthResult<Self> {
        match inline {
            Some(json) => {
                debug!("Using inline lookup context");
                Self::from_json(json)
            }
            None => Self::load(path),
        }
    }

    /// Load the cache; a missing file behaves as an empty cache
    pub fn load(path: impl AsRef<Path>) -> SynthResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Context file not found, lookups will fail");
            return Ok(Self::from_entries(BTreeMap::new()));
        }
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Parse a context document (a JSON object of lookup entries)
    pub fn from_json(json: &str) -> SynthResult<Self> {
        Ok(Self::from_entries(serde_json::from_str(json)?))
    }

    pub fn from_entries(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }
}

impl HostedZoneProvider for ContextFile {
    fn lookup(&self, query: &HostedZoneQuery) -> SynthResult<HostedZoneAttributes> {
        let key = query.context_key();
        let Some(entry) = self.entries.get(&key) else {
            debug!(%key, "No cached lookup");
            return Err(query.not_found());
        };

        let attributes: HostedZoneAttributes = serde_json::from_value(entry.clone())?;
        let cached_name = DomainName::new(attributes.name.as_str())?;
        if cached_name != query.domain_name {
            return Err(SynthError::Configuration(format!(
                "cached zone {} does not match lookup for {}",
                cached_name, query.domain_name
            )));
        }

        debug!(%key, zone_id = attributes.zone_id(), "Resolved hosted zone");
        Ok(attributes)
    }
}
