//! Host configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CHAINCODE_STATE_DB` | `couchdb` | `couchdb` or `goleveldb` |
//! | `ASSET_PUBLIC_COLLECTION` | `collectionAssets` | Public record collection |
//! | `ASSET_PRIVATE_COLLECTION` | `collectionAssetPrivateDetails` | Confidential details collection |
//!
//! Logging variables are read by [`TelemetryConfig::from_env`].

use anyhow::{Context, Result};
use asset_chaincode::adapters::StateDatabase;
use asset_chaincode::config::ChaincodeConfig;
use ledger_telemetry::TelemetryConfig;
use std::env;

/// Full host configuration.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    pub state_db: StateDatabase,
    pub chaincode: ChaincodeConfig,
    pub telemetry: TelemetryConfig,
}

impl HostConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let state_db = match env::var("CHAINCODE_STATE_DB") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("CHAINCODE_STATE_DB={value}"))?,
            Err(_) => StateDatabase::default(),
        };

        let chaincode = ChaincodeConfig::from_env().context("invalid collection configuration")?;

        Ok(Self {
            state_db,
            chaincode,
            telemetry: TelemetryConfig::from_env(),
        })
    }

    /// Validate cross-field constraints after overrides were applied.
    pub fn validate(&self) -> Result<()> {
        self.chaincode
            .validate()
            .context("invalid collection configuration")?;
        ledger_telemetry::build_filter(&self.telemetry).context("invalid log filter")?;
        Ok(())
    }
}
