// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service roles and inline policies

use serde_json::{json, Value};

use crate::construct::NodeId;
use crate::domain::ResourceKind;
use crate::errors::SynthResult;
use crate::stack::Stack;
use crate::template::intrinsic::{get_att, partition_arn, reference};
use crate::template::Resource;

pub const LAMBDA_BASIC_EXECUTION: &str =
    "iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";
pub const API_GATEWAY_PUSH_TO_CLOUDWATCH: &str =
    "iam::aws:policy/service-role/AmazonAPIGatewayPushToCloudWatchLogs";

/// A role assumable by one service principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRole {
    pub scope: NodeId,
    pub logical_id: String,
}

impl ServiceRole {
    /// Declare `<parent>/<id>/Resource` trusting `service`
    pub fn new(
        stack: &mut Stack,
        parent: NodeId,
        id: &str,
        service: &str,
        managed_policies: &[&str],
    ) -> SynthResult<Self> {
        let scope = stack.scope(parent, id)?;
        let managed: Vec<Value> = managed_policies.iter().map(|arn| partition_arn(arn)).collect();

        let logical_id = stack.declare(
            scope,
            "Resource",
            Resource::new(
                ResourceKind::IamRole,
                json!({
                    "AssumeRolePolicyDocument": {
                        "Statement": [{
                            "Action": "sts:AssumeRole",
                            "Effect": "Allow",
                            "Principal": { "Service": service },
                        }],
                        "Version": "2012-10-17",
                    },
                    "ManagedPolicyArns": managed,
                }),
            ),
        )?;

        Ok(Self { scope, logical_id })
    }

    pub fn arn(&self) -> Value {
        get_att(&self.logical_id, "Arn")
    }

    /// Attach an inline policy as `<role>/DefaultPolicy/Resource`
    pub fn add_default_policy(
        &self,
        stack: &mut Stack,
        statements: Vec<Value>,
    ) -> SynthResult<String> {
        let scope = stack.scope(self.scope, "DefaultPolicy")?;
        let policy_name = stack.tree().logical_id(scope);
        stack.declare(
            scope,
            "Resource",
            Resource::new(
                ResourceKind::IamPolicy,
                json!({
                    "PolicyDocument": {
                        "Statement": statements,
                        "Version": "2012-10-17",
                    },
                    "PolicyName": policy_name,
                    "Roles": [reference(&self.logical_id)],
                }),
            ),
        )
    }
}

/// `{ Action, Effect: Allow, Resource }` policy statement
pub fn allow(actions: &[&str], resource: Value) -> Value {
    let action = match actions {
        [single] => json!(single),
        many => json!(many),
    };
    json!({ "Action": action, "Effect": "Allow", "Resource": resource })
}
