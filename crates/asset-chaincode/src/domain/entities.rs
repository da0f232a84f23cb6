//! # Domain Entities
//!
//! The two records that make up one asset:
//!
//! - [`Asset`]: public record, stored in the public collection.
//! - [`AssetConfidentialDetails`]: private record, stored in the
//!   private-details collection under the same name.
//!
//! Both carry a `docType` tag so rich queries can tell them apart.

use crate::errors::{ChaincodeError, ChaincodeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `docType` tag of the public record.
pub const ASSET_DOC_TYPE: &str = "Asset";

/// `docType` tag of the private record.
pub const DETAILS_DOC_TYPE: &str = "AssetConfidentialDetails";

// =============================================================================
// SECRET
// =============================================================================

/// Confidential value held only in the private-details collection.
///
/// `Debug` and `Display` are redacted so the value cannot leak through
/// log fields or error formatting.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a confidential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the value is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

// =============================================================================
// ASSET
// =============================================================================

/// Public asset record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Always [`ASSET_DOC_TYPE`].
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// Unique, immutable key.
    pub name: String,
    /// Current owner.
    pub owner: String,
}

impl Asset {
    /// Create a public record.
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            doc_type: ASSET_DOC_TYPE.to_string(),
            name: name.into(),
            owner: owner.into(),
        }
    }

    /// Encode as stored JSON.
    pub fn to_json(&self) -> ChaincodeResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ChaincodeError::Serialization(e.to_string()))
    }

    /// Decode a stored record found under `name`.
    pub fn from_json(name: &str, bytes: &[u8]) -> ChaincodeResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| ChaincodeError::CorruptRecord {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// CONFIDENTIAL DETAILS
// =============================================================================

/// Private asset record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfidentialDetails {
    /// Always [`DETAILS_DOC_TYPE`].
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// Same key as the public record.
    pub name: String,
    /// Confidential value.
    pub secret: Secret,
}

impl AssetConfidentialDetails {
    /// Create a private record.
    pub fn new(name: impl Into<String>, secret: Secret) -> Self {
        Self {
            doc_type: DETAILS_DOC_TYPE.to_string(),
            name: name.into(),
            secret,
        }
    }

    /// Encode as stored JSON.
    pub fn to_json(&self) -> ChaincodeResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ChaincodeError::Serialization(e.to_string()))
    }

    /// Decode a stored record found under `name`.
    ///
    /// The reason is taken from the error category only, since the record
    /// holds the secret.
    pub fn from_json(name: &str, bytes: &[u8]) -> ChaincodeResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| ChaincodeError::CorruptRecord {
            name: name.to_string(),
            reason: format!("{:?} error at line {} column {}", e.classify(), e.line(), e.column()),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
