// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for ohw-infrastructure
//!
//! Provides a deterministic deployment target: a fixed account, a fixed
//! hosted zone, and a throwaway function artifact with fixed contents.
#![allow(dead_code)]

use std::fs;
use tempfile::TempDir;

use ohw_infrastructure::domain::DomainName;
use ohw_infrastructure::resources::StaticZones;
use ohw_infrastructure::StackConfig;

pub const ACCOUNT: &str = "123456789012";
pub const REGION: &str = "eu-west-2";
pub const ZONE_NAME: &str = "jun.codes";
pub const ZONE_ID: &str = "Z0123456789ABCDEFGHIJ";
pub const DOMAIN: &str = "ohw-server.jun.codes";

/// Artifact directory holding a `bootstrap` executable
pub fn artifact() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create artifact dir");
    fs::write(dir.path().join("bootstrap"), b"\x7fELF ohw-server").expect("Failed to write bootstrap");
    dir
}

/// Zone provider that knows `jun.codes`
pub fn zones() -> StaticZones {
    StaticZones::new().with_zone(
        DomainName::new(ZONE_NAME).expect("Invalid zone name"),
        format!("/hostedzone/{ZONE_ID}"),
    )
}

/// The fixed configuration, pointed at `artifact`
pub fn config(artifact: &TempDir) -> StackConfig {
    StackConfig::default()
        .with_account(ACCOUNT)
        .with_artifact_dir(artifact.path())
}
