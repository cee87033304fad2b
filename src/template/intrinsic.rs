// Copyright (c) 2025 - Cowboy AI, Inc.
//! CloudFormation intrinsic functions and pseudo parameters

use serde_json::{json, Value};

pub const PARTITION: &str = "AWS::Partition";
pub const REGION: &str = "AWS::Region";
pub const ACCOUNT_ID: &str = "AWS::AccountId";
pub const URL_SUFFIX: &str = "AWS::URLSuffix";

/// `{ "Ref": logical_id }`
pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{ "Fn::GetAtt": [logical_id, attribute] }`
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{ "Fn::Join": [delimiter, parts] }`
pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

/// `arn:<partition>:<rest>` with the partition resolved at deploy time
pub fn partition_arn(rest: &str) -> Value {
    join("", vec![json!("arn:"), reference(PARTITION), json!(format!(":{rest}"))])
}

/// Logical ids named by every `Ref` and `Fn::GetAtt` inside `value`
///
/// Pseudo parameters (`AWS::...`) are skipped. Ids are returned in
/// encounter order, duplicates included.
pub fn referenced_logical_ids(value: &Value) -> Vec<String> {
    let mut ids = Vec::new();
    collect_references(value, &mut ids);
    ids
}

fn collect_references(value: &Value, ids: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get("Ref") {
                if !id.starts_with("AWS::") {
                    ids.push(id.clone());
                }
            }
            if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
                if let Some(Value::String(id)) = parts.first() {
                    ids.push(id.clone());
                }
            }
            for (key, nested) in map {
                if key != "Ref" && key != "Fn::GetAtt" {
                    collect_references(nested, ids);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_references(item, ids)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        assert_eq!(reference("Api"), json!({ "Ref": "Api" }));
        assert_eq!(get_att("Fn", "Arn"), json!({ "Fn::GetAtt": ["Fn", "Arn"] }));
        assert_eq!(
            partition_arn("iam::aws:policy/X"),
            json!({ "Fn::Join": ["", ["arn:", { "Ref": "AWS::Partition" }, ":iam::aws:policy/X"]] })
        );
    }

    #[test]
    fn test_referenced_logical_ids() {
        let value = json!({
            "DNSName": get_att("Domain", "DistributionDomainName"),
            "HostedZoneId": get_att("Domain", "DistributionHostedZoneId"),
            "Arn": partition_arn("lambda"),
            "Nested": [reference("Api")],
        });

        let mut ids = referenced_logical_ids(&value);
        ids.sort();
        assert_eq!(ids, vec!["Api", "Domain", "Domain"]);
    }
}
