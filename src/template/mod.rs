// Copyright (c) 2025 - Cowboy AI, Inc.
//! CloudFormation Template Model
//!
//! The desired-state description produced by synthesis. Every collection is
//! ordered (`BTreeMap`, `BTreeSet`, sorted tag lists) so rendering the same
//! template twice yields byte-identical JSON.

pub mod intrinsic;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::construct::ConstructError;
use crate::domain::{ResourceCategory, ResourceKind};
use crate::errors::SynthResult;

/// A single template resource
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub properties: Map<String, Value>,
    pub depends_on: BTreeSet<String>,
}

impl Resource {
    /// Create a resource from a JSON object of properties
    ///
    /// Non-object values produce a resource with no properties.
    pub fn new(kind: ResourceKind, properties: Value) -> Self {
        let properties = match properties {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            kind,
            properties,
            depends_on: BTreeSet::new(),
        }
    }

    /// Add an explicit creation-order dependency
    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.insert(logical_id.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Type", self.kind.template_type())?;
        if !self.properties.is_empty() {
            map.serialize_entry("Properties", &self.properties)?;
        }
        if !self.depends_on.is_empty() {
            map.serialize_entry("DependsOn", &self.depends_on)?;
        }
        map.end()
    }
}

/// A template output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Value")]
    pub value: Value,
}

/// CloudFormation template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    resources: BTreeMap<String, Resource>,
    outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under a logical id
    pub fn add_resource(
        &mut self,
        logical_id: impl Into<String>,
        resource: Resource,
    ) -> Result<(), ConstructError> {
        let logical_id = logical_id.into();
        if self.resources.contains_key(&logical_id) {
            return Err(ConstructError::LogicalIdCollision(logical_id));
        }
        self.resources.insert(logical_id, resource);
        Ok(())
    }

    /// Register an output under a logical id
    pub fn add_output(
        &mut self,
        logical_id: impl Into<String>,
        output: Output,
    ) -> Result<(), ConstructError> {
        let logical_id = logical_id.into();
        if self.outputs.contains_key(&logical_id) {
            return Err(ConstructError::LogicalIdCollision(logical_id));
        }
        self.outputs.insert(logical_id, output);
        Ok(())
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(id, resource)| (id.as_str(), resource))
    }

    /// All resources of one kind, in logical id order
    pub fn resources_of_kind(&self, kind: ResourceKind) -> Vec<(&str, &Resource)> {
        self.resources()
            .filter(|(_, resource)| resource.kind == kind)
            .collect()
    }

    /// Resource count per category
    pub fn category_counts(&self) -> BTreeMap<ResourceCategory, usize> {
        let mut counts = BTreeMap::new();
        for resource in self.resources.values() {
            *counts.entry(resource.kind.category()).or_insert(0) += 1;
        }
        counts
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Output)> {
        self.outputs.iter().map(|(id, output)| (id.as_str(), output))
    }

    /// Apply stack tags to every resource type that accepts them
    ///
    /// Tags already set on a resource win over stack tags with the same key.
    /// The resulting list is sorted by key.
    pub fn apply_tags(&mut self, tags: &BTreeMap<String, String>) {
        if tags.is_empty() {
            return;
        }

        for resource in self.resources.values_mut() {
            if !resource.kind.is_taggable() {
                continue;
            }

            let mut merged = tags.clone();
            if let Some(Value::Array(existing)) = resource.properties.get("Tags") {
                for tag in existing {
                    if let (Some(key), Some(value)) = (tag["Key"].as_str(), tag["Value"].as_str()) {
                        merged.insert(key.to_string(), value.to_string());
                    }
                }
            }

            let list: Vec<Value> = merged
                .into_iter()
                .map(|(key, value)| json!({ "Key": key, "Value": value }))
                .collect();
            resource.properties.insert("Tags".into(), Value::Array(list));
        }
    }

    /// Render the template document
    pub fn to_json(&self) -> SynthResult<Value> {
        let mut document = Map::new();
        document.insert("Resources".into(), serde_json::to_value(&self.resources)?);
        if !self.outputs.is_empty() {
            document.insert("Outputs".into(), serde_json::to_value(&self.outputs)?);
        }
        Ok(Value::Object(document))
    }
}
