// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Name Value Object with DNS Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Domain name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainNameError {
    #[error("Domain name is empty")]
    Empty,

    #[error("Domain name exceeds maximum length of 253 characters: {0}")]
    TooLong(usize),

    #[error("Label exceeds maximum length of 63 characters: {0}")]
    LabelTooLong(String),

    #[error("Invalid character in domain name: {0}")]
    InvalidCharacter(char),

    #[error("Label cannot start or end with hyphen: {0}")]
    InvalidLabelFormat(String),

    #[error("Top-level label cannot be all numeric: {0}")]
    NumericTld(String),

    #[error("{name} is not within zone {zone}")]
    OutsideZone { name: String, zone: String },
}

/// DNS domain name value object
///
/// Stored in lowercase canonical form without a trailing dot. Invariants
/// follow RFC 1123:
/// - Total length ≤ 253 characters
/// - Each label 1..=63 characters of alphanumerics and hyphens
/// - Labels cannot start or end with hyphens
/// - The last label cannot be all numeric
///
/// # Examples
///
/// ```rust
/// use ohw_infrastructure::domain::DomainName;
///
/// let zone = DomainName::new("jun.codes").unwrap();
/// let host = zone.subdomain("ohw-server").unwrap();
/// assert_eq!(host.as_str(), "ohw-server.jun.codes");
/// assert_eq!(host.to_absolute(), "ohw-server.jun.codes.");
///
/// assert!(DomainName::new("-invalid").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Maximum total length (RFC 1123)
    pub const MAX_LENGTH: usize = 253;

    /// Maximum length for a single label (RFC 1123)
    pub const MAX_LABEL_LENGTH: usize = 63;

    /// Create a validated domain name
    ///
    /// A single trailing dot (absolute form) is accepted and dropped.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainNameError> {
        let name = name.into();
        let name = name.strip_suffix('.').unwrap_or(&name).to_ascii_lowercase();

        if name.is_empty() {
            return Err(DomainNameError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(DomainNameError::TooLong(name.len()));
        }

        for label in name.split('.') {
            Self::validate_label(label)?;
        }

        if let Some(tld) = name.rsplit('.').next() {
            if tld.chars().all(|c| c.is_ascii_digit()) {
                return Err(DomainNameError::NumericTld(tld.to_string()));
            }
        }

        Ok(Self(name))
    }

    fn validate_label(label: &str) -> Result<(), DomainNameError> {
        if label.is_empty() {
            return Err(DomainNameError::Empty);
        }

        if label.len() > Self::MAX_LABEL_LENGTH {
            return Err(DomainNameError::LabelTooLong(label.to_string()));
        }

        if let Some(ch) = label
            .chars()
            .find(|ch| !ch.is_ascii_alphanumeric() && *ch != '-')
        {
            return Err(DomainNameError::InvalidCharacter(ch));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(DomainNameError::InvalidLabelFormat(label.to_string()));
        }

        Ok(())
    }

    /// Get the domain name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prepend a single label (or dotted prefix) to this name
    pub fn subdomain(&self, prefix: &str) -> Result<Self, DomainNameError> {
        Self::new(format!("{}.{}", prefix, self.0))
    }

    /// Absolute form with trailing dot, as Route 53 stores record names
    pub fn to_absolute(&self) -> String {
        format!("{}.", self.0)
    }

    /// Whether this name equals `zone` or sits beneath it
    pub fn is_within(&self, zone: &DomainName) -> bool {
        self == zone || self.0.ends_with(&format!(".{}", zone.0))
    }

    /// Name relative to `zone`, e.g. `ohw-server` for `ohw-server.jun.codes`
    pub fn record_name_in(&self, zone: &DomainName) -> Result<&str, DomainNameError> {
        self.0
            .strip_suffix(&format!(".{}", zone.0))
            .ok_or_else(|| DomainNameError::OutsideZone {
                name: self.0.clone(),
                zone: zone.0.clone(),
            })
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DomainName {
    type Error = DomainNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DomainName {
    type Error = DomainNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_domain_names() {
        assert!(DomainName::new("jun.codes").is_ok());
        assert!(DomainName::new("ohw-server.jun.codes").is_ok());
        assert!(DomainName::new("a").is_ok());
        assert!(DomainName::new("jun.codes.").is_ok());
    }

    #[test]
    fn test_invalid_domain_names() {
        assert_eq!(DomainName::new(""), Err(DomainNameError::Empty));
        assert_eq!(DomainName::new("."), Err(DomainNameError::Empty));
        assert!(DomainName::new("-ohw.jun.codes").is_err());
        assert!(DomainName::new("ohw-.jun.codes").is_err());
        assert!(DomainName::new("ohw..codes").is_err());
        assert_eq!(
            DomainName::new("ohw_server.jun.codes"),
            Err(DomainNameError::InvalidCharacter('_'))
        );
        assert!(DomainName::new("10.0.0.1").is_err());
    }

    #[test]
    fn test_length_limits() {
        let max_label = "a".repeat(63);
        assert!(DomainName::new(format!("{}.codes", max_label)).is_ok());
        assert!(DomainName::new(format!("{}a.codes", max_label)).is_err());

        let long = format!("{}.{}.codes", "a".repeat(125), "b".repeat(125));
        assert!(matches!(DomainName::new(long), Err(DomainNameError::TooLong(_))));
    }

    #[test]
    fn test_canonical_form() {
        let name = DomainName::new("OHW-Server.Jun.Codes.").unwrap();
        assert_eq!(name.as_str(), "ohw-server.jun.codes");
        assert_eq!(name.to_absolute(), "ohw-server.jun.codes.");
    }

    #[test]
    fn test_zone_relationships() {
        let zone = DomainName::new("jun.codes").unwrap();
        let host = zone.subdomain("ohw-server").unwrap();

        assert!(host.is_within(&zone));
        assert!(zone.is_within(&zone));
        assert_eq!(host.record_name_in(&zone), Ok("ohw-server"));

        let other = DomainName::new("notjun.codes").unwrap();
        assert!(!other.is_within(&zone));
        assert!(other.record_name_in(&zone).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let name: DomainName = serde_json::from_str("\"jun.codes\"").unwrap();
        assert_eq!(name.as_str(), "jun.codes");
        assert!(serde_json::from_str::<DomainName>("\"bad_name\"").is_err());
    }
}
