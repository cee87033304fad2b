// Copyright (c) 2025 - Cowboy AI, Inc.
//! ohw-cdk
//!
//! Synthesizes the one-hit-wonder stack into a cloud assembly.
//!
//! Run with: cargo run --bin ohw-cdk
//!
//! Environment:
//! 1. CDK_DEFAULT_ACCOUNT: target account (required)
//! 2. CDK_OUTDIR: assembly directory (default: cdk.out)
//! 3. CDK_CONTEXT_JSON: inline hosted zone lookup context
//! 4. CDK_CONTEXT_FILE: lookup cache used without inline context
//!    (default: cdk.context.json)
//! 5. OHW_ARTIFACT_DIR: prebuilt function artifact
//!    (default: ../ohw-server/target/lambda/ohw-server)

use anyhow::{Context, Result};
use ohw_infrastructure::{synthesize, ContextFile, StackConfig};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = StackConfig::from_env();
    info!("📋 Configuration loaded:");
    info!("  - Stack: {}", config.stack_id);
    info!("  - Environment: {}", config.env.to_uri());
    info!("  - Artifact: {}", config.artifact_dir.display());
    info!("  - Output: {}", config.out_dir.display());

    let zones = ContextFile::resolve(config.context_json.as_deref(), &config.context_file)
        .with_context(|| {
            match config.context_json {
                Some(_) => "Failed to parse CDK_CONTEXT_JSON".to_string(),
                None => format!(
                    "Failed to load lookup context from {}",
                    config.context_file.display()
                ),
            }
        })?;

    let out_dir = config.out_dir.clone();
    let assembly = synthesize(config, &zones).context("Failed to synthesize stack")?;

    assembly
        .write(&out_dir)
        .with_context(|| format!("Failed to write cloud assembly to {}", out_dir.display()))?;

    info!("✅ Synthesized {} to {}", assembly.stack_id(), out_dir.display());
    Ok(())
}
