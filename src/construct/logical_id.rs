// Copyright (c) 2025 - Cowboy AI, Inc.
//! Logical id derivation

use sha2::{Digest, Sha256};

const HIDDEN_ID: &str = "Default";
const HIDDEN_FROM_HUMAN_ID: &str = "Resource";
const MAX_HUMAN_LENGTH: usize = 240;
const HASH_LENGTH: usize = 8;

/// Derive a template logical id from path components below the stack
///
/// A single component keeps its alphanumeric characters only. Deeper paths
/// get a human-readable prefix plus an 8-character hash of the full path,
/// so two constructs with similar names never collide.
pub fn logical_id_for(components: &[&str]) -> String {
    if let [single] = components {
        return remove_non_alphanumeric(single);
    }

    let hash = path_hash(components);

    let human: String = components
        .iter()
        .enumerate()
        .filter(|(index, component)| {
            **component != HIDDEN_ID
                && !(*index == components.len() - 1 && **component == HIDDEN_FROM_HUMAN_ID)
        })
        .map(|(_, component)| remove_non_alphanumeric(component))
        .collect();

    let human: String = human.chars().take(MAX_HUMAN_LENGTH).collect();
    format!("{human}{hash}")
}

fn path_hash(components: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(components.join("/"));
    let digest = format!("{:X}", hasher.finalize());
    digest[..HASH_LENGTH].to_string()
}

fn remove_non_alphanumeric(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphanumeric).collect()
}
