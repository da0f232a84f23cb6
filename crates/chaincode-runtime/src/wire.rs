//! Line protocol of the development host.
//!
//! One JSON request per input line:
//!
//! ```json
//! {"function":"create","args":[],"transient":{"asset":"eyJuYW1lIjoiQXNzZXQxIn0="}}
//! ```
//!
//! Transient values are base64 (standard alphabet, padded), as a client SDK
//! would send them. One JSON reply per line comes back:
//!
//! ```json
//! {"tx_id":"…","status":200,"message":"","payload":"…","encoding":"utf8","committed_writes":2}
//! ```

use asset_chaincode::domain::TransientMap;
use asset_chaincode::handler::{Invocation, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Request decoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("malformed request at line {line} column {column}")]
    MalformedRequest { line: usize, column: usize },

    #[error("transient value for {0} is not valid base64")]
    InvalidTransientEncoding(String),
}

/// One invocation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvocationRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Base64-encoded transient values.
    #[serde(default)]
    pub transient: HashMap<String, String>,
}

impl InvocationRequest {
    /// Parse one request line. The line may carry a secret, so the error
    /// reports position only.
    pub fn parse(line: &str) -> Result<Self, WireError> {
        serde_json::from_str(line).map_err(|e| WireError::MalformedRequest {
            line: e.line(),
            column: e.column(),
        })
    }

    /// Decode transient values into a chaincode invocation.
    pub fn into_invocation(self) -> Result<Invocation, WireError> {
        let mut transient = TransientMap::with_capacity(self.transient.len());
        for (key, encoded) in self.transient {
            let bytes = STANDARD
                .decode(encoded.as_bytes())
                .map_err(|_| WireError::InvalidTransientEncoding(key.clone()))?;
            transient.insert(key, bytes);
        }
        Ok(Invocation {
            function: self.function,
            args: self.args,
            transient,
        })
    }
}

/// How `payload` is encoded in a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    Utf8,
    Base64,
}

/// One invocation reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationReply {
    pub tx_id: Uuid,
    pub status: u16,
    pub message: String,
    pub payload: String,
    pub encoding: PayloadEncoding,
    pub committed_writes: usize,
}

impl InvocationReply {
    pub fn new(tx_id: Uuid, response: Response, committed_writes: usize) -> Self {
        let (payload, encoding) = match String::from_utf8(response.payload) {
            Ok(text) => (text, PayloadEncoding::Utf8),
            Err(e) => (STANDARD.encode(e.into_bytes()), PayloadEncoding::Base64),
        };
        Self {
            tx_id,
            status: response.status,
            message: response.message,
            payload,
            encoding,
            committed_writes,
        }
    }

    /// Raw payload bytes.
    pub fn payload_bytes(&self) -> Vec<u8> {
        match self.encoding {
            PayloadEncoding::Utf8 => self.payload.as_bytes().to_vec(),
            PayloadEncoding::Base64 => STANDARD.decode(&self.payload).unwrap_or_default(),
        }
    }
}
