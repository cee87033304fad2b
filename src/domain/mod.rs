// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Domain Models
//!
//! Value objects and pure invariants for the deployment stack.
//!
//! # Value Objects with Invariants
//!
//! - [`DomainName`] - DNS-validated names (RFC 1123)
//! - [`ResourceKind`] - CloudFormation resource taxonomy
//! - [`EndpointType`], [`SecurityPolicy`], [`ApiKeySource`], [`Runtime`],
//!   [`Throttling`] - fixed gateway and function policy choices

pub mod dns;
pub mod invariants;
pub mod policy;
pub mod resource_type;

pub use dns::{DomainName, DomainNameError};
pub use invariants::{ValidationError, ValidationResult};
pub use policy::{
    ApiKeySource, EndpointType, Runtime, SecurityPolicy, Throttling, EDGE_CERTIFICATE_REGION,
};
pub use resource_type::{ResourceCategory, ResourceKind};
