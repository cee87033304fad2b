// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Stack Invariants
//!
//! Business rules the composed stack must satisfy before anything is
//! written. All functions are pure and return detailed validation results.
//!
//! # Invariant Categories
//!
//! 1. **Certificate placement**: endpoint type dictates the issuing region
//! 2. **Reference integrity**: the alias record targets the gateway domain
//! 3. **Policy limits**: throttling limits are usable
//! 4. **Zone membership**: records live inside the looked-up zone

use super::{DomainName, EndpointType, Throttling};

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Certificate issued in a region the endpoint type cannot use
    #[error("{endpoint} endpoints need a certificate in {required}, got {actual}")]
    CertificateRegion {
        endpoint: EndpointType,
        required: String,
        actual: String,
    },

    /// Alias record does not point at the gateway's custom domain
    #[error("Alias target references {actual:?}, expected domain resource {expected}")]
    DanglingAliasTarget { expected: String, actual: Vec<String> },

    /// Certificate bound to a different domain than the record serves
    #[error("Certificate covers {certificate}, but the gateway serves {domain}")]
    CertificateDomainMismatch { certificate: String, domain: String },

    /// Throttling limit that would reject every request or cannot be rendered
    #[error("Throttling {field} must be positive and finite, got {value}")]
    InvalidThrottling { field: &'static str, value: f64 },

    /// Record name outside the hosted zone
    #[error("Record {record} is not within zone {zone}")]
    RecordOutsideZone { record: String, zone: String },

    /// Expected resource missing from the synthesized template
    #[error("Missing resource: {0}")]
    MissingResource(String),
}

/// Validate the certificate region against the endpoint type
///
/// # Rules
/// - EDGE endpoints require the fixed edge region, whatever the stack region
/// - REGIONAL endpoints require the stack region
pub fn validate_certificate_region(
    endpoint: EndpointType,
    stack_region: &str,
    certificate_region: &str,
) -> ValidationResult {
    let required = endpoint.certificate_region(stack_region);
    if required != certificate_region {
        return Err(ValidationError::CertificateRegion {
            endpoint,
            required: required.to_string(),
            actual: certificate_region.to_string(),
        });
    }
    Ok(())
}

/// Validate the alias record references exactly the gateway domain resource
///
/// `referenced` holds every logical id the alias target mentions. It must
/// be non-empty and name nothing but `domain_logical_id`.
pub fn validate_alias_target(domain_logical_id: &str, referenced: &[String]) -> ValidationResult {
    if referenced.is_empty() || referenced.iter().any(|id| id != domain_logical_id) {
        return Err(ValidationError::DanglingAliasTarget {
            expected: domain_logical_id.to_string(),
            actual: referenced.to_vec(),
        });
    }
    Ok(())
}

/// Validate the certificate and the custom domain name agree
pub fn validate_certificate_domain(
    certificate_domain: &DomainName,
    gateway_domain: &DomainName,
) -> ValidationResult {
    if certificate_domain != gateway_domain {
        return Err(ValidationError::CertificateDomainMismatch {
            certificate: certificate_domain.to_string(),
            domain: gateway_domain.to_string(),
        });
    }
    Ok(())
}

/// Validate throttling limits are positive and finite
///
/// Non-finite rates have no JSON form and would render as `null`.
pub fn validate_throttling(throttling: &Throttling) -> ValidationResult {
    if throttling.burst_limit == 0 {
        return Err(ValidationError::InvalidThrottling {
            field: "burst_limit",
            value: 0.0,
        });
    }
    if !throttling.rate_limit.is_finite() || throttling.rate_limit <= 0.0 {
        return Err(ValidationError::InvalidThrottling {
            field: "rate_limit",
            value: throttling.rate_limit,
        });
    }
    Ok(())
}

/// Validate a record name falls inside its zone
pub fn validate_record_in_zone(record: &DomainName, zone: &DomainName) -> ValidationResult {
    if record == zone || !record.is_within(zone) {
        return Err(ValidationError::RecordOutsideZone {
            record: record.to_string(),
            zone: zone.to_string(),
        });
    }
    Ok(())
}
