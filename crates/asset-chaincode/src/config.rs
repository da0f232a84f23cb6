//! Chaincode configuration
//!
//! Collection names are deployment settings: they must match the collection
//! configuration the chaincode was instantiated with.
//!
//! # Environment Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ASSET_PUBLIC_COLLECTION` | `collectionAssets` |
//! | `ASSET_PRIVATE_COLLECTION` | `collectionAssetPrivateDetails` |

use std::env;
use thiserror::Error;

/// Default collection for public asset records.
pub const DEFAULT_PUBLIC_COLLECTION: &str = "collectionAssets";

/// Default collection for confidential details.
pub const DEFAULT_PRIVATE_COLLECTION: &str = "collectionAssetPrivateDetails";

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("collection name for {0} must not be empty")]
    EmptyCollection(&'static str),

    #[error("public and private collections must differ, both are {0}")]
    SharedCollection(String),
}

/// Chaincode configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChaincodeConfig {
    /// Collection holding `Asset` records.
    pub public_collection: String,
    /// Collection holding `AssetConfidentialDetails` records.
    pub private_collection: String,
}

impl Default for ChaincodeConfig {
    fn default() -> Self {
        Self {
            public_collection: DEFAULT_PUBLIC_COLLECTION.to_string(),
            private_collection: DEFAULT_PRIVATE_COLLECTION.to_string(),
        }
    }
}

impl ChaincodeConfig {
    /// Read from the environment, falling back to defaults, and validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            public_collection: env::var("ASSET_PUBLIC_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_COLLECTION.to_string()),
            private_collection: env::var("ASSET_PRIVATE_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_PRIVATE_COLLECTION.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Collection names must be non-empty and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.public_collection.is_empty() {
            return Err(ConfigError::EmptyCollection("public records"));
        }
        if self.private_collection.is_empty() {
            return Err(ConfigError::EmptyCollection("confidential details"));
        }
        // One collection for both halves would publish the secret
        if self.public_collection == self.private_collection {
            return Err(ConfigError::SharedCollection(self.public_collection.clone()));
        }
        Ok(())
    }

    /// Builder-style method to set the public collection
    pub fn with_public_collection(mut self, name: impl Into<String>) -> Self {
        self.public_collection = name.into();
        self
    }

    /// Builder-style method to set the private collection
    pub fn with_private_collection(mut self, name: impl Into<String>) -> Self {
        self.private_collection = name.into();
        self
    }
}
