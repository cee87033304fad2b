// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compute Unit
//!
//! A function plus its execution role. The code comes either from a staged
//! asset (the prebuilt server) or from inline source (small provider
//! handlers).

use serde_json::{json, Value};
use tracing::debug;

use super::iam::{ServiceRole, LAMBDA_BASIC_EXECUTION};
use crate::construct::NodeId;
use crate::domain::{ResourceKind, Runtime};
use crate::errors::SynthResult;
use crate::stack::Stack;
use crate::template::intrinsic::get_att;
use crate::template::Resource;

/// Where a function's code comes from
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionCode {
    /// `{ S3Bucket, S3Key }` of an uploaded asset
    Asset(Value),
    /// Source embedded in the template
    Inline(&'static str),
}

impl FunctionCode {
    fn to_property(&self) -> Value {
        match self {
            Self::Asset(location) => location.clone(),
            Self::Inline(source) => json!({ "ZipFile": source }),
        }
    }
}

/// Properties of a [`Function`]
#[derive(Debug, Clone)]
pub struct FunctionProps<'a> {
    /// Physical function name; generated by the provider when `None`
    pub function_name: Option<&'a str>,
    pub handler: &'a str,
    pub runtime: Runtime,
    pub code: FunctionCode,
    /// Timeout in seconds; provider default when `None`
    pub timeout: Option<u32>,
}

/// A declared function
#[derive(Debug, Clone)]
pub struct Function {
    pub scope: NodeId,
    pub logical_id: String,
    pub role: ServiceRole,
}

impl Function {
    /// Declare `<parent>/<id>` with `ServiceRole/Resource` and `Resource`
    pub fn new(
        stack: &mut Stack,
        parent: NodeId,
        id: &str,
        props: FunctionProps<'_>,
    ) -> SynthResult<Self> {
        let scope = stack.scope(parent, id)?;
        let role = ServiceRole::new(
            stack,
            scope,
            "ServiceRole",
            "lambda.amazonaws.com",
            &[LAMBDA_BASIC_EXECUTION],
        )?;

        let mut properties = json!({
            "Code": props.code.to_property(),
            "Handler": props.handler,
            "Role": role.arn(),
            "Runtime": props.runtime.as_str(),
        });
        if let Some(name) = props.function_name {
            properties["FunctionName"] = json!(name);
        }
        if let Some(timeout) = props.timeout {
            properties["Timeout"] = json!(timeout);
        }

        let logical_id = stack.declare(
            scope,
            "Resource",
            Resource::new(ResourceKind::LambdaFunction, properties)
                .depends_on(role.logical_id.clone()),
        )?;

        debug!(%logical_id, runtime = %props.runtime, "Declared function");
        Ok(Self {
            scope,
            logical_id,
            role,
        })
    }

    pub fn arn(&self) -> Value {
        get_att(&self.logical_id, "Arn")
    }

    /// Allow `principal` to invoke the function from `source_arn`
    ///
    /// The permission is declared under `parent`, next to whatever construct
    /// performs the invocation.
    pub fn grant_invoke(
        &self,
        stack: &mut Stack,
        parent: NodeId,
        id: &str,
        principal: &str,
        source_arn: Value,
    ) -> SynthResult<String> {
        stack.declare(
            parent,
            id,
            Resource::new(
                ResourceKind::LambdaPermission,
                json!({
                    "Action": "lambda:InvokeFunction",
                    "FunctionName": self.arn(),
                    "Principal": principal,
                    "SourceArn": source_arn,
                }),
            ),
        )
    }
}
