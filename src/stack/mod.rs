// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Composition
//!
//! [`Stack`] pairs the construct tree with the template it synthesizes to.
//! Resource builders receive `&mut Stack` plus the parent [`NodeId`] they
//! declare under; each declaration registers the node and its template
//! resource in one step, so the two can never drift apart.

mod one_hit_wonder;

pub use one_hit_wonder::OneHitWonderStack;

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::config::Environment;
use crate::construct::{ConstructTree, NodeId};
use crate::errors::SynthResult;
use crate::template::{Output, Resource, Template};

/// A stack under construction
#[derive(Debug, Clone)]
pub struct Stack {
    env: Environment,
    tags: BTreeMap<String, String>,
    tree: ConstructTree,
    template: Template,
}

impl Stack {
    pub fn new(
        id: &str,
        env: Environment,
        tags: BTreeMap<String, String>,
    ) -> SynthResult<Self> {
        Ok(Self {
            env,
            tags,
            tree: ConstructTree::new(id)?,
            template: Template::new(),
        })
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn id(&self) -> &str {
        self.tree.id(self.root())
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn tree(&self) -> &ConstructTree {
        &self.tree
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Declare a grouping scope under `parent`
    pub fn scope(&mut self, parent: NodeId, id: &str) -> SynthResult<NodeId> {
        Ok(self.tree.add_scope(parent, id)?)
    }

    /// Declare a resource under `parent`, returning its logical id
    pub fn declare(&mut self, parent: NodeId, id: &str, resource: Resource) -> SynthResult<String> {
        let node = self.tree.add_resource(parent, id, resource.kind)?;
        let logical_id = self.tree.logical_id(node);
        self.template.add_resource(logical_id.clone(), resource)?;
        Ok(logical_id)
    }

    /// Declare a resource whose logical id also encodes `fingerprint`
    ///
    /// Any change to the fingerprinted value renames the resource, which
    /// makes the provider replace it instead of updating it in place.
    pub fn declare_versioned(
        &mut self,
        parent: NodeId,
        id: &str,
        resource: Resource,
        fingerprint: &Value,
    ) -> SynthResult<String> {
        let node = self.tree.add_resource(parent, id, resource.kind)?;

        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(fingerprint)?);
        let digest = format!("{:x}", hasher.finalize());
        let logical_id = format!("{}{}", self.tree.logical_id(node), &digest[..32]);

        self.template.add_resource(logical_id.clone(), resource)?;
        Ok(logical_id)
    }

    /// Declare a template output under `parent`
    pub fn output(&mut self, parent: NodeId, id: &str, output: Output) -> SynthResult<String> {
        let node = self.tree.add_scope(parent, id)?;
        let logical_id = self.tree.logical_id(node);
        self.template.add_output(logical_id.clone(), output)?;
        Ok(logical_id)
    }

    /// Propagate stack tags onto every taggable resource
    pub fn apply_tags(&mut self) {
        self.template.apply_tags(&self.tags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceKind;
    use crate::errors::SynthError;
    use serde_json::json;

    fn stack() -> Stack {
        Stack::new(
            "TestStack",
            Environment::new("123456789012", "eu-west-2"),
            BTreeMap::from([("project".to_string(), "ohw".to_string())]),
        )
        .unwrap()
    }

    #[test]
    fn test_declare_registers_node_and_resource() {
        let mut stack = stack();
        let root = stack.root();
        let scope = stack.scope(root, "handler").unwrap();
        let id = stack
            .declare(scope, "Resource", Resource::new(ResourceKind::LambdaFunction, json!({})))
            .unwrap();

        assert!(id.starts_with("handler"));
        assert!(stack.template().resource(&id).is_some());
        assert_eq!(stack.tree().resource_count(), 1);
    }

    #[test]
    fn test_duplicate_declaration_fails() {
        let mut stack = stack();
        let root = stack.root();
        let resource = Resource::new(ResourceKind::IamRole, json!({}));
        stack.declare(root, "Role", resource.clone()).unwrap();
        assert!(matches!(
            stack.declare(root, "Role", resource),
            Err(SynthError::Construct(_))
        ));
    }

    #[test]
    fn test_versioned_id_tracks_fingerprint() {
        let mut a = stack();
        let mut b = stack();
        let resource = Resource::new(ResourceKind::ApiDeployment, json!({}));

        let root = a.root();
        let first = a
            .declare_versioned(root, "Deployment", resource.clone(), &json!({ "v": 1 }))
            .unwrap();
        let root = b.root();
        let second = b
            .declare_versioned(root, "Deployment", resource, &json!({ "v": 2 }))
            .unwrap();

        assert!(first.starts_with("Deployment"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_tags_applied() {
        let mut stack = stack();
        let root = stack.root();
        let id = stack
            .declare(root, "Fn", Resource::new(ResourceKind::LambdaFunction, json!({})))
            .unwrap();
        stack.apply_tags();
        assert_eq!(
            stack.template().resource(&id).unwrap().property("Tags"),
            Some(&json!([{ "Key": "project", "Value": "ohw" }]))
        );
    }
}
