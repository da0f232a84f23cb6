//! # Confidential Input Decoder
//!
//! Mutating functions receive their fields through the transient map, which
//! is not recorded in the transaction. Each function has a typed input and a
//! fixed transient key:
//!
//! | Function | Key | Input |
//! |----------|-----|-------|
//! | `create` | `asset` | [`CreateAssetInput`] |
//! | `transfer` | `asset_owner` | [`TransferAssetInput`] |
//! | `delete` | `asset_delete` | [`DeleteAssetInput`] |
//!
//! Decoding is a two-step pipeline: parse into the typed input, then
//! validate every required field. Nothing touches the store before both
//! steps succeed.

use super::entities::Secret;
use crate::errors::InputError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Transient map delivered with an invocation.
pub type TransientMap = HashMap<String, Vec<u8>>;

/// Transient key for [`CreateAssetInput`].
pub const CREATE_KEY: &str = "asset";
/// Transient key for [`TransferAssetInput`].
pub const TRANSFER_KEY: &str = "asset_owner";
/// Transient key for [`DeleteAssetInput`].
pub const DELETE_KEY: &str = "asset_delete";

/// A typed input carried in the transient map.
pub trait TransientInput: DeserializeOwned {
    /// Transient map key the input is read from.
    const KEY: &'static str;

    /// Field-level validation, run after a successful parse.
    fn validate(&self) -> Result<(), InputError>;
}

/// Input of `create`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateAssetInput {
    pub name: String,
    pub owner: String,
    pub secret: Secret,
}

impl TransientInput for CreateAssetInput {
    const KEY: &'static str = CREATE_KEY;

    fn validate(&self) -> Result<(), InputError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("owner", &self.owner)?;
        if self.secret.is_empty() {
            return Err(InputError::MissingRequiredField("secret"));
        }
        Ok(())
    }
}

/// Input of `transfer`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransferAssetInput {
    pub name: String,
    pub owner: String,
}

impl TransientInput for TransferAssetInput {
    const KEY: &'static str = TRANSFER_KEY;

    fn validate(&self) -> Result<(), InputError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("owner", &self.owner)
    }
}

/// Input of `delete`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeleteAssetInput {
    pub name: String,
}

impl TransientInput for DeleteAssetInput {
    const KEY: &'static str = DELETE_KEY;

    fn validate(&self) -> Result<(), InputError> {
        require_non_empty("name", &self.name)
    }
}

/// Extract, parse and validate the input stored under `T::KEY`.
pub fn decode_transient<T: TransientInput>(transient: &TransientMap) -> Result<T, InputError> {
    let payload = transient
        .get(T::KEY)
        .ok_or_else(|| InputError::MissingConfidentialKey(T::KEY.to_string()))?;

    if payload.is_empty() {
        return Err(InputError::EmptyConfidentialPayload(T::KEY.to_string()));
    }

    let value: Value = serde_json::from_slice(payload).map_err(malformed::<T>)?;

    // Derived struct impls also accept sequences by position; only objects
    // carry named fields.
    if !value.is_object() {
        return Err(InputError::MalformedConfidentialPayload {
            key: T::KEY.to_string(),
            reason: format!("expected a JSON object, found {}", json_kind(&value)),
        });
    }

    let input = T::deserialize(value).map_err(malformed::<T>)?;
    input.validate()?;

    debug!(key = T::KEY, payload_len = payload.len(), "Decoded transient input");
    Ok(input)
}

// serde_json messages can quote offending values; report position only.
fn malformed<T: TransientInput>(e: serde_json::Error) -> InputError {
    let reason = if e.line() == 0 {
        format!("{:?} error", e.classify())
    } else {
        format!(
            "{:?} error at line {} column {}",
            e.classify(),
            e.line(),
            e.column()
        )
    };
    InputError::MalformedConfidentialPayload {
        key: T::KEY.to_string(),
        reason,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.is_empty() {
        return Err(InputError::MissingRequiredField(field));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
