// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource builders
//!
//! Each builder declares one logical resource (and the supporting resources
//! it needs) under a parent scope of a [`Stack`](crate::stack::Stack).

pub mod certificate;
pub mod function;
pub mod gateway;
pub mod hosted_zone;
pub mod iam;
pub mod record;

pub use certificate::{CertificateProps, DnsValidatedCertificate};
pub use function::{Function, FunctionCode, FunctionProps};
pub use gateway::{DomainProps, GatewayProps, LambdaRestApi};
pub use hosted_zone::{
    ContextFile, HostedZoneAttributes, HostedZoneProvider, HostedZoneQuery, StaticZones,
};
pub use iam::ServiceRole;
pub use record::{ARecord, RecordProps};
