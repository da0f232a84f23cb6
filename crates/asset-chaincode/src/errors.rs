//! # Error Types
//!
//! All error types for asset chaincode execution.
//!
//! Every variant renders to a single message. None of them carries
//! confidential payload text: decode failures report the parser category
//! and position only.

use std::fmt;
use thiserror::Error;

/// Result alias used by lifecycle operations and handlers.
pub type ChaincodeResult<T> = Result<T, ChaincodeError>;

// =============================================================================
// CHAINCODE ERRORS
// =============================================================================

/// Which half of the asset pair an existence check concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Public `Asset` record.
    Asset,
    /// Private `AssetConfidentialDetails` record.
    ConfidentialDetails,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => f.write_str("Asset"),
            Self::ConfidentialDetails => f.write_str("AssetConfidentialDetails"),
        }
    }
}

/// Errors that terminate a chaincode invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChaincodeError {
    /// Invalid positional arguments or transient input.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The named record does not exist.
    #[error("{kind} does not exist: {name}")]
    NotFound { kind: RecordKind, name: String },

    /// An asset with this name already exists.
    #[error("asset already exists: {name}")]
    AlreadyExists { name: String },

    /// Reading state failed for a reason other than absence.
    #[error("failed to read state: {0}")]
    StoreRead(StoreError),

    /// Writing or deleting state failed.
    #[error("failed to write state: {0}")]
    StoreWrite(StoreError),

    /// A selector query was issued against a store without rich queries.
    #[error("rich queries are not supported by the state database")]
    QueryEngineUnsupported,

    /// The invocation named a function that is not registered.
    #[error("received unknown function invocation: {0}")]
    UnknownFunction(String),

    /// A stored record could not be decoded.
    #[error("stored record {name} is corrupt: {reason}")]
    CorruptRecord { name: String, reason: String },

    /// A record could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ChaincodeError {
    /// Coarse category used as a structured log field.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::NotFound { .. } | Self::AlreadyExists { .. } => "existence",
            Self::StoreRead(_) | Self::StoreWrite(_) | Self::CorruptRecord { .. } => "store",
            Self::QueryEngineUnsupported => "query",
            Self::UnknownFunction(_) => "dispatch",
            Self::Serialization(_) => "internal",
        }
    }
}

// =============================================================================
// INPUT ERRORS
// =============================================================================

/// Expected positional argument count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgCount {
    /// Exactly this many arguments.
    Exactly(usize),
    /// At least this many arguments; extra ones are ignored.
    AtLeast(usize),
}

impl ArgCount {
    /// Whether `actual` satisfies this expectation.
    #[must_use]
    pub fn accepts(self, actual: usize) -> bool {
        match self {
            Self::Exactly(n) => actual == n,
            Self::AtLeast(n) => actual >= n,
        }
    }
}

impl fmt::Display for ArgCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Errors from argument and transient-map validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Wrong number of positional arguments.
    #[error("incorrect number of arguments for {function}: expecting {expected}, got {actual}")]
    IncorrectArgumentCount {
        function: String,
        expected: ArgCount,
        actual: usize,
    },

    /// The expected key is not present in the transient map.
    #[error("{0} must be a key in the transient map")]
    MissingConfidentialKey(String),

    /// The transient value for the key is empty.
    #[error("{0} value in the transient map must be a non-empty JSON string")]
    EmptyConfidentialPayload(String),

    /// The transient value could not be parsed into the expected input.
    #[error("failed to decode JSON of transient key {key}: {reason}")]
    MalformedConfidentialPayload { key: String, reason: String },

    /// A required string field is empty or missing.
    #[error("{0} field must be a non-empty string")]
    MissingRequiredField(&'static str),
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors raised by a [`LedgerStore`](crate::ports::LedgerStore) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The runtime could not serve the request.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The state database has no rich-query engine.
    #[error("rich queries are not supported by the state database")]
    QueryEngineUnsupported,

    /// The query expression was rejected by the query engine.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A result cursor failed while iterating.
    #[error("iteration failed: {0}")]
    Iteration(String),

    /// Internal lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Classify a failure from a read or query path.
    #[must_use]
    pub fn into_read_error(self) -> ChaincodeError {
        match self {
            Self::QueryEngineUnsupported => ChaincodeError::QueryEngineUnsupported,
            other => ChaincodeError::StoreRead(other),
        }
    }

    /// Classify a failure from a put or delete path.
    #[must_use]
    pub fn into_write_error(self) -> ChaincodeError {
        ChaincodeError::StoreWrite(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
