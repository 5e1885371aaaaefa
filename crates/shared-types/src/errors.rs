//! # Error Types
//!
//! Defines the error taxonomy shared across components.
//!
//! | Kind | Meaning |
//! |------|---------|
//! | `Validation` | malformed or missing argument, rejected before any read |
//! | `NotFound` | the record an operation conditions on does not exist |
//! | `Conflict` | semantic no-op or disallowed re-application |
//! | `IntegrityFault` | ledger contents contradict an invariant, never retried |
//! | `Precondition` | election phase does not allow the operation |
//! | `Unavailable` | store or commit failure, propagated unmasked |
//!
//! A caller-supplied id that cannot form a ledger key is a `Validation`
//! error even though the key builder reports it as a `StoreError`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the ledger store or its commit validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A key read during simulation changed before commit.
    #[error("MVCC read conflict on key {key}")]
    MvccReadConflict { key: String },

    /// A range read during simulation no longer returns the same keys.
    #[error("Phantom read detected for range {prefix}")]
    PhantomRead { prefix: String },

    /// A write was attempted inside a read-only evaluation.
    #[error("Write attempted in read-only transaction")]
    ReadOnlyTransaction,

    /// Key construction rejected a segment.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backing storage failed.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true if re-simulating the transaction may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::MvccReadConflict { .. } | Self::PhantomRead { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Coarse classification of a [`ContractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    IntegrityFault,
    Precondition,
    Unavailable,
}

impl ErrorKind {
    /// Stable lowercase label used in responses and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::IntegrityFault => "integrity_fault",
            Self::Precondition => "precondition",
            Self::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by every component operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// Argument missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No handler registered under this name.
    #[error("Unknown operation {function} on component {component}")]
    UnknownOperation { component: String, function: String },

    /// Record absent.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Election id or name already used.
    #[error("Election already exists: {0}")]
    AlreadyExists(String),

    /// Voter already holds a permit for this election.
    #[error("Permit already issued for this voter in election {election_id}")]
    AlreadyIssued { election_id: String },

    /// Election is already running.
    #[error("Election {0} is already started")]
    AlreadyStarted(String),

    /// Election has been finished at some point in its history.
    #[error("Election {0} is already finished")]
    AlreadyFinished(String),

    /// Permit has been redeemed.
    #[error("Permit already spent or invalid")]
    AlreadySpent,

    /// A fresh permit hashed onto an existing permit record.
    #[error("Permit already exists (hash collision or reuse): {permit_hash}")]
    PermitCollision { permit_hash: String },

    /// Election is not in the Started phase.
    #[error("Election {0} is not started or is finished")]
    ElectionNotActive(String),

    /// Tallies are sealed until the election finishes.
    #[error("Election {0} is not finished yet")]
    NotFinished(String),

    /// Store or commit failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContractError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::UnknownOperation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists(_)
            | Self::AlreadyIssued { .. }
            | Self::AlreadyStarted(_)
            | Self::AlreadyFinished(_)
            | Self::AlreadySpent => ErrorKind::Conflict,
            Self::PermitCollision { .. } => ErrorKind::IntegrityFault,
            Self::ElectionNotActive(_) | Self::NotFinished(_) => ErrorKind::Precondition,
            Self::Store(StoreError::InvalidKey(_)) => ErrorKind::Validation,
            Self::Store(_) => ErrorKind::Unavailable,
        }
    }

    /// Returns true only for commit-time conflicts that a re-simulation may clear.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }

    /// Shorthand for a missing record.
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }
}
