//! # Core Entities
//!
//! Identifiers and metadata shared by all components:
//!
//! - **Time**: `Timestamp`, the deterministic per-transaction clock value
//! - **Routing**: `ComponentId`, the target of a named remote call
//! - **Operation tables**: `OperationMode`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ContractError;

/// Transaction timestamp. Every record written by one transaction carries
/// the same value.
pub type Timestamp = DateTime<Utc>;

/// The three ledger components reachable through named remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentId {
    /// Election Lifecycle Manager.
    Election,
    /// Voter Permit Issuer.
    Permit,
    /// Vote Tally Aggregator.
    Tally,
}

impl ComponentId {
    pub const ALL: [ComponentId; 3] = [Self::Election, Self::Permit, Self::Tally];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Election => "election",
            Self::Permit => "permit",
            Self::Tally => "tally",
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentId {
    type Err = ContractError;

    /// Accepts the short names as well as the deployed contract names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "election" | "electioncc" => Ok(Self::Election),
            "permit" | "voterpermitcc" => Ok(Self::Permit),
            "tally" | "votetallycc" => Ok(Self::Tally),
            other => Err(ContractError::Validation(format!(
                "unknown component: {other}"
            ))),
        }
    }
}

/// Whether an operation may write to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationMode {
    /// Evaluated against committed state, never committed.
    ReadOnly,
    /// Simulated, then submitted for commit.
    Mutating,
}

impl OperationMode {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly)
    }
}
