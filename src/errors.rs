// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for stack synthesis

use std::path::PathBuf;
use thiserror::Error;

use crate::construct::ConstructError;
use crate::domain::{DomainNameError, ValidationError};

/// Errors that can occur while composing or synthesizing the stack
///
/// Every variant is fatal: synthesis stops and no assembly is written.
#[derive(Debug, Error)]
pub enum SynthError {
    /// The prebuilt function artifact is missing
    #[error("Function artifact not found at {0}")]
    ArtifactNotFound(PathBuf),

    /// Malformed fixed configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Hosted zone lookup found nothing for the domain
    #[error("Hosted zone not found for {domain} (account {account}, region {region})")]
    HostedZoneNotFound {
        domain: String,
        account: String,
        region: String,
    },

    /// Construct tree rejected a node
    #[error(transparent)]
    Construct(#[from] ConstructError),

    /// A domain name failed DNS validation
    #[error("Invalid domain name: {0}")]
    DomainName(#[from] DomainNameError),

    /// The composed stack broke one of its invariants
    #[error("Invariant violated: {0}")]
    Invariant(#[from] ValidationError),

    /// Filesystem error while fingerprinting, staging or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for synthesis operations
pub type SynthResult<T> = Result<T, SynthError>;
