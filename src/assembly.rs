// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud Assembly
//!
//! Synthesis turns a [`StackConfig`] into the `cdk.out` directory consumed
//! by deployment tooling:
//!
//! ```text
//! cdk.out/
//! ├── manifest.json
//! ├── tree.json
//! ├── <stack>.template.json
//! ├── <stack>.assets.json
//! └── asset.<hash>/
//! ```
//!
//! [`synthesize`] does all the fallible work in memory. Nothing touches
//! the output directory until [`CloudAssembly::write`].

use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::asset::{Asset, BOOTSTRAP_QUALIFIER};
use crate::config::{Environment, StackConfig};
use crate::errors::SynthResult;
use crate::resources::HostedZoneProvider;
use crate::stack::OneHitWonderStack;

/// Cloud assembly schema version the manifests conform to
pub const SCHEMA_VERSION: &str = "21.0.0";

/// Bootstrap stack version the asset roles require
const BOOTSTRAP_VERSION: u32 = 6;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const TREE_FILE: &str = "tree.json";

/// Synthesize the stack described by `config`
///
/// Fingerprinting, zone lookup, composition and validation all happen
/// here; any failure returns before anything is written.
pub fn synthesize(
    config: StackConfig,
    zones: &dyn HostedZoneProvider,
) -> SynthResult<CloudAssembly> {
    info!(stack = %config.stack_id, region = %config.env.region, "Synthesizing");
    let stack = OneHitWonderStack::new(config, zones)?;
    let assembly = CloudAssembly::from_stack(&stack)?;
    debug!(files = assembly.documents.len(), "Rendered assembly documents");
    Ok(assembly)
}

/// A fully rendered assembly, ready to be written
#[derive(Debug, Clone)]
pub struct CloudAssembly {
    stack_id: String,
    asset: Asset,
    documents: BTreeMap<String, Value>,
}

impl CloudAssembly {
    fn from_stack(stack: &OneHitWonderStack) -> SynthResult<Self> {
        let config = stack.config();
        let env = &config.env;
        let stack_id = config.stack_id.clone();

        let template = stack.template().to_json()?;
        let template_file = template_file_name(&stack_id);
        let assets_file = assets_file_name(&stack_id);

        let template_hash = content_hash(&render(&template)?);
        let assets = assets_manifest(env, stack.asset(), &template_file, &template_hash)?;
        let manifest = cloud_manifest(
            &stack_id,
            env,
            &config.tags,
            &template_file,
            &assets_file,
            &template_hash,
        )?;

        let documents = BTreeMap::from([
            (MANIFEST_FILE.to_string(), manifest),
            (TREE_FILE.to_string(), stack.stack().tree().to_tree_json()),
            (template_file, template),
            (assets_file, assets),
        ]);

        Ok(Self {
            stack_id,
            asset: stack.asset().clone(),
            documents,
        })
    }

    pub fn stack_id(&self) -> &str {
        &self.stack_id
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// Parsed form of one assembly document
    pub fn document(&self, file_name: &str) -> Option<&Value> {
        self.documents.get(file_name)
    }

    /// The stack's template document
    pub fn template(&self) -> Option<&Value> {
        self.document(&template_file_name(&self.stack_id))
    }

    /// Every document rendered as pretty-printed JSON, keyed by file name
    pub fn render(&self) -> SynthResult<BTreeMap<String, String>> {
        self.documents
            .iter()
            .map(|(name, document)| Ok((name.clone(), render(document)?)))
            .collect()
    }

    /// Write the documents and stage the asset under `out_dir`
    pub fn write(&self, out_dir: &Path) -> SynthResult<()> {
        let rendered = self.render()?;
        fs::create_dir_all(out_dir)?;

        self.asset.stage(out_dir)?;
        for (name, contents) in &rendered {
            fs::write(out_dir.join(name), contents)?;
            debug!(file = %name, bytes = contents.len(), "Wrote assembly file");
        }

        info!(
            out_dir = %out_dir.display(),
            files = rendered.len(),
            asset = %self.asset.staged_dir_name(),
            "Wrote cloud assembly"
        );
        Ok(())
    }
}

pub fn template_file_name(stack_id: &str) -> String {
    format!("{stack_id}.template.json")
}

pub fn assets_file_name(stack_id: &str) -> String {
    format!("{stack_id}.assets.json")
}

fn render(document: &Value) -> SynthResult<String> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    Ok(rendered)
}

fn content_hash(contents: &str) -> String {
    format!("{:x}", Sha256::digest(contents.as_bytes()))
}

fn bootstrap_role(env: &Environment, role: &str) -> SynthResult<String> {
    Ok(format!(
        "arn:${{AWS::Partition}}:iam::{}:role/cdk-{}-{}-role-{}-{}",
        env.require_account()?,
        BOOTSTRAP_QUALIFIER,
        role,
        env.require_account()?,
        env.region
    ))
}

fn bootstrap_version_parameter() -> String {
    format!("/cdk-bootstrap/{BOOTSTRAP_QUALIFIER}/version")
}

/// `<stack>.assets.json`: the function asset plus the template itself
fn assets_manifest(
    env: &Environment,
    asset: &Asset,
    template_file: &str,
    template_hash: &str,
) -> SynthResult<Value> {
    let account = env.require_account()?;
    let destination_id = format!("{}-{}", account, env.region);

    let mut files = Map::new();
    files.insert(asset.hash.clone(), asset.manifest_entry(env)?);
    files.insert(
        template_hash.to_string(),
        json!({
            "source": {
                "path": template_file,
                "packaging": "file",
            },
            "destinations": {
                (destination_id): {
                    "bucketName": Asset::bucket_name(env)?,
                    "objectKey": format!("{template_hash}.json"),
                    "region": env.region,
                    "assumeRoleArn": bootstrap_role(env, "file-publishing")?,
                }
            }
        }),
    );

    Ok(json!({
        "version": SCHEMA_VERSION,
        "files": files,
        "dockerImages": {},
    }))
}

/// `manifest.json`: the stack artifact, its asset manifest and the tree
fn cloud_manifest(
    stack_id: &str,
    env: &Environment,
    tags: &BTreeMap<String, String>,
    template_file: &str,
    assets_file: &str,
    template_hash: &str,
) -> SynthResult<Value> {
    let assets_artifact = format!("{stack_id}.assets");
    let template_url = format!(
        "s3://{}/{}.json",
        Asset::bucket_name(env)?,
        template_hash
    );

    let mut artifacts = Map::new();
    artifacts.insert(
        assets_artifact.clone(),
        json!({
            "type": "cdk:asset-manifest",
            "properties": {
                "file": assets_file,
                "requiresBootstrapStackVersion": BOOTSTRAP_VERSION,
                "bootstrapStackVersionSsmParameter": bootstrap_version_parameter(),
            }
        }),
    );
    artifacts.insert(
        stack_id.to_string(),
        json!({
            "type": "aws:cloudformation:stack",
            "environment": env.to_uri(),
            "properties": {
                "templateFile": template_file,
                "tags": tags,
                "validateOnSynth": false,
                "assumeRoleArn": bootstrap_role(env, "deploy")?,
                "cloudFormationExecutionRoleArn": bootstrap_role(env, "cfn-exec")?,
                "stackTemplateAssetObjectUrl": template_url,
                "requiresBootstrapStackVersion": BOOTSTRAP_VERSION,
                "bootstrapStackVersionSsmParameter": bootstrap_version_parameter(),
            },
            "dependencies": [assets_artifact],
            "displayName": stack_id,
        }),
    );
    artifacts.insert(
        "Tree".to_string(),
        json!({
            "type": "cdk:tree",
            "properties": { "file": TREE_FILE },
        }),
    );

    Ok(json!({
        "version": SCHEMA_VERSION,
        "artifacts": artifacts,
    }))
}
