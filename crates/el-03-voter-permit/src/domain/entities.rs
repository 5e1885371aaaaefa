//! # Permit Entities
//!
//! Only the SHA-256 hash of a permit secret ever reaches the ledger.

use serde::{Deserialize, Serialize};
use shared_types::{ContractError, Timestamp};

/// Marks that a voter has been issued a permit for an election.
///
/// Existence is the whole meaning; the record is never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterRecord {
    pub election_id: String,
    pub voter_hash: String,
    pub issued_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermitStatus {
    Issued,
    Spent,
}

/// A one-time voting credential, keyed by the hash of its secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitRecord {
    pub election_id: String,
    pub permit_hash: String,
    pub status: PermitStatus,
    pub issued_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent_at: Option<Timestamp>,
}

impl PermitRecord {
    pub fn issue(election_id: &str, permit_hash: &str, at: Timestamp) -> Self {
        Self {
            election_id: election_id.to_string(),
            permit_hash: permit_hash.to_string(),
            status: PermitStatus::Issued,
            issued_at: at,
            spent_at: None,
        }
    }

    /// Issued → Spent. Any other starting status is `AlreadySpent`.
    pub fn spend(&mut self, at: Timestamp) -> Result<(), ContractError> {
        if self.status != PermitStatus::Issued {
            return Err(ContractError::AlreadySpent);
        }
        self.status = PermitStatus::Spent;
        self.spent_at = Some(at);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePermitResponse {
    pub permit_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasVotedResponse {
    pub has: bool,
}
