// Copyright (c) 2025 - Cowboy AI, Inc.
//! Construct Tree
//!
//! Every resource is declared as a node under exactly one parent scope. The
//! node's path (`OneHitWonderStack/ohw-api/Resource`) is its identity: it
//! names the resource in `tree.json` and derives its template logical id.
//!
//! ```text
//! OneHitWonderStack
//! ├── ohw-server-handler
//! │   ├── ServiceRole/Resource   AWS::IAM::Role
//! │   └── Resource               AWS::Lambda::Function
//! ├── ohw-certificate
//! │   └── ...
//! └── ohw-server-api-record
//!     └── Resource               AWS::Route53::RecordSet
//! ```
//!
//! The tree is an arena: nodes never move, and [`NodeId`] handles are threaded
//! explicitly into every child creation.

mod logical_id;

pub use logical_id::logical_id_for;

use serde_json::{json, Map, Value};

use crate::domain::ResourceKind;

/// Errors raised while declaring constructs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
    #[error("Construct id cannot be empty (under {parent})")]
    EmptyId { parent: String },

    #[error("Construct id {0:?} cannot contain '/'")]
    InvalidId(String),

    #[error("Duplicate construct id {id:?} under {parent}")]
    Duplicate { parent: String, id: String },

    #[error("Logical id {0} is already taken by another construct")]
    LogicalIdCollision(String),
}

/// Handle to a node in a [`ConstructTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    id: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: Option<ResourceKind>,
}

/// Arena of construct nodes rooted at a stack
#[derive(Debug, Clone)]
pub struct ConstructTree {
    nodes: Vec<Node>,
}

impl ConstructTree {
    /// Create a tree whose root is the stack construct `stack_id`
    pub fn new(stack_id: &str) -> Result<Self, ConstructError> {
        validate_id(stack_id, "<app>")?;
        Ok(Self {
            nodes: vec![Node {
                id: stack_id.to_string(),
                parent: None,
                children: Vec::new(),
                kind: None,
            }],
        })
    }

    /// The stack node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Declare a scope (a construct that owns no template resource itself)
    pub fn add_scope(&mut self, parent: NodeId, id: &str) -> Result<NodeId, ConstructError> {
        self.insert(parent, id, None)
    }

    /// Declare a node that synthesizes to a template resource of `kind`
    pub fn add_resource(
        &mut self,
        parent: NodeId,
        id: &str,
        kind: ResourceKind,
    ) -> Result<NodeId, ConstructError> {
        self.insert(parent, id, Some(kind))
    }

    fn insert(
        &mut self,
        parent: NodeId,
        id: &str,
        kind: Option<ResourceKind>,
    ) -> Result<NodeId, ConstructError> {
        validate_id(id, &self.path(parent))?;

        if self.children(parent).any(|child| self.nodes[child.0].id == id) {
            return Err(ConstructError::Duplicate {
                parent: self.path(parent),
                id: id.to_string(),
            });
        }

        let node = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id: id.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(node);
        Ok(node)
    }

    fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[node.0].children.iter().copied()
    }

    /// The node's own id
    pub fn id(&self, node: NodeId) -> &str {
        &self.nodes[node.0].id
    }

    /// Resource kind declared for the node, if any
    pub fn kind(&self, node: NodeId) -> Option<ResourceKind> {
        self.nodes[node.0].kind
    }

    /// Path components from the stack root down to `node`
    pub fn components(&self, node: NodeId) -> Vec<&str> {
        let mut components = Vec::new();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            components.push(self.nodes[current.0].id.as_str());
            cursor = self.nodes[current.0].parent;
        }
        components.reverse();
        components
    }

    /// Full construct path, e.g. `OneHitWonderStack/ohw-api/Resource`
    pub fn path(&self, node: NodeId) -> String {
        self.components(node).join("/")
    }

    /// Template logical id for `node`
    pub fn logical_id(&self, node: NodeId) -> String {
        // The stack itself never appears in logical ids.
        let components = self.components(node);
        logical_id_for(&components[1..])
    }

    /// Number of nodes that synthesize to template resources
    pub fn resource_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.kind.is_some()).count()
    }

    /// Render the hierarchy in `tree.json` form
    pub fn to_tree_json(&self) -> Value {
        let root = self.root();
        let mut children = Map::new();
        children.insert(self.id(root).to_string(), self.node_json(root));

        json!({
            "version": "tree-0.1",
            "tree": {
                "id": "App",
                "path": "",
                "children": children,
            }
        })
    }

    fn node_json(&self, node: NodeId) -> Value {
        let mut object = Map::new();
        object.insert("id".into(), json!(self.id(node)));
        object.insert("path".into(), json!(self.path(node)));

        if !self.nodes[node.0].children.is_empty() {
            let children: Map<String, Value> = self
                .children(node)
                .map(|child| (self.id(child).to_string(), self.node_json(child)))
                .collect();
            object.insert("children".into(), Value::Object(children));
        }

        if let Some(kind) = self.kind(node) {
            object.insert(
                "attributes".into(),
                json!({ "aws:cdk:cloudformation:type": kind.template_type() }),
            );
        }

        Value::Object(object)
    }
}

fn validate_id(id: &str, parent: &str) -> Result<(), ConstructError> {
    if id.is_empty() {
        return Err(ConstructError::EmptyId {
            parent: parent.to_string(),
        });
    }
    if id.contains('/') {
        return Err(ConstructError::InvalidId(id.to_string()));
    }
    Ok(())
}
