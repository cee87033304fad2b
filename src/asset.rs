// Copyright (c) 2025 - Cowboy AI, Inc.
//! Function Code Assets
//!
//! The prebuilt artifact is fingerprinted at synthesis time and staged into
//! the cloud assembly. The deployment tool zips the staged directory and
//! uploads it to the bootstrap bucket under `<hash>.zip`.

use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Environment;
use crate::errors::{SynthError, SynthResult};

/// Bootstrap qualifier of the default deployment toolkit stack
pub const BOOTSTRAP_QUALIFIER: &str = "hnb659fds";

/// A fingerprinted directory of function code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    /// Source directory as configured
    pub source: PathBuf,
    /// Hex SHA-256 over the directory's relative paths and contents
    pub hash: String,
}

impl Asset {
    /// Fingerprint the artifact at `source`
    ///
    /// Fails with [`SynthError::ArtifactNotFound`] when nothing exists there.
    /// A single file is accepted as well as a directory.
    pub fn fingerprint(source: impl Into<PathBuf>) -> SynthResult<Self> {
        let source = source.into();
        if !source.exists() {
            return Err(SynthError::ArtifactNotFound(source));
        }

        let mut files = Vec::new();
        if source.is_dir() {
            collect_files(&source, &source, &mut files)?;
        } else {
            let name = source
                .file_name()
                .map(PathBuf::from)
                .ok_or_else(|| SynthError::ArtifactNotFound(source.clone()))?;
            files.push((name, source.clone()));
        }
        files.sort();

        let mut hasher = Sha256::new();
        for (relative, absolute) in &files {
            let relative = relative.to_string_lossy().replace('\\', "/");
            hasher.update(relative.as_bytes());
            hasher.update([0u8]);
            hasher.update(fs::read(absolute)?);
            hasher.update([0u8]);
        }
        let hash = format!("{:x}", hasher.finalize());

        debug!(source = %source.display(), files = files.len(), %hash, "Fingerprinted asset");
        Ok(Self { source, hash })
    }

    /// Directory name of the staged copy inside the assembly
    pub fn staged_dir_name(&self) -> String {
        format!("asset.{}", self.hash)
    }

    /// Object key the packaged asset is uploaded under
    pub fn object_key(&self) -> String {
        format!("{}.zip", self.hash)
    }

    /// Bootstrap bucket the asset is uploaded to
    pub fn bucket_name(env: &Environment) -> SynthResult<String> {
        Ok(format!(
            "cdk-{}-assets-{}-{}",
            BOOTSTRAP_QUALIFIER,
            env.require_account()?,
            env.region
        ))
    }

    /// `Code` property of a function built from this asset
    pub fn code_property(&self, env: &Environment) -> SynthResult<Value> {
        Ok(json!({
            "S3Bucket": Self::bucket_name(env)?,
            "S3Key": self.object_key(),
        }))
    }

    /// Copy the artifact into `<out_dir>/asset.<hash>`
    ///
    /// Staging is skipped when that directory already exists: the hash
    /// already pins its contents.
    pub fn stage(&self, out_dir: &Path) -> SynthResult<PathBuf> {
        let target = out_dir.join(self.staged_dir_name());
        if target.exists() {
            debug!(target = %target.display(), "Asset already staged");
            return Ok(target);
        }

        fs::create_dir_all(&target)?;
        if self.source.is_dir() {
            copy_dir(&self.source, &target)?;
        } else if let Some(name) = self.source.file_name() {
            fs::copy(&self.source, target.join(name))?;
        }

        info!(target = %target.display(), "Staged function asset");
        Ok(target)
    }

    /// Entry for `<stack>.assets.json`
    pub fn manifest_entry(&self, env: &Environment) -> SynthResult<Value> {
        let account = env.require_account()?;
        let destination_id = format!("{}-{}", account, env.region);
        Ok(json!({
            "source": {
                "path": self.staged_dir_name(),
                "packaging": "zip",
            },
            "destinations": {
                (destination_id): {
                    "bucketName": Self::bucket_name(env)?,
                    "objectKey": self.object_key(),
                    "region": env.region,
                    "assumeRoleArn": format!(
                        "arn:${{AWS::Partition}}:iam::{}:role/cdk-{}-file-publishing-role-{}-{}",
                        account, BOOTSTRAP_QUALIFIER, account, env.region
                    ),
                }
            }
        }))
    }
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<(PathBuf, PathBuf)>) -> SynthResult<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(root, &path, files)?;
        } else {
            let relative = path
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            files.push((relative, path));
        }
    }
    Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> SynthResult<()> {
    for entry in fs::read_dir(from)? {
        let path = entry?.path();
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = to.join(name);
        if path.is_dir() {
            fs::create_dir_all(&target)?;
            copy_dir(&path, &target)?;
        } else {
            fs::copy(&path, &target)?;
        }
    }
    Ok(())
}
