// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment infrastructure for the one-hit-wonder server
//!
//! This crate describes the ohw-server deployment as a CloudFormation cloud
//! assembly: a Lambda function behind a REST API, published on a custom
//! domain with a DNS-validated certificate and an alias record.
//!
//! Synthesis is pure and deterministic. The same configuration, artifact and
//! zone cache always produce byte-identical output.
//!
//! ```no_run
//! use ohw_infrastructure::{synthesize, ContextFile, StackConfig};
//!
//! # fn main() -> ohw_infrastructure::SynthResult<()> {
//! let config = StackConfig::from_env();
//! let zones = ContextFile::load(&config.context_file)?;
//! let out_dir = config.out_dir.clone();
//! synthesize(config, &zones)?.write(&out_dir)?;
//! # Ok(())
//! # }
//! ```

pub mod assembly;
pub mod asset;
pub mod config;
pub mod construct;
pub mod domain;
pub mod errors;
pub mod resources;
pub mod stack;
pub mod template;

// Re-export commonly used types
pub use assembly::{synthesize, CloudAssembly};
pub use config::{Environment, StackConfig};
pub use errors::{SynthError, SynthResult};
pub use resources::{ContextFile, HostedZoneProvider, StaticZones};
pub use stack::OneHitWonderStack;
