//! # Tally Entities

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;

/// Vote counter for one (election, constituency, candidate) triple.
///
/// Carries no permit or voter identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyRecord {
    pub election_id: String,
    pub constituency_id: String,
    pub candidate_id: String,
    pub vote_count: u64,
    /// `None` only on the zero record returned for a candidate with no votes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl TallyRecord {
    /// Zero-count record for a candidate nobody voted for. Never stored.
    pub fn zero(election_id: &str, constituency_id: &str, candidate_id: &str) -> Self {
        Self {
            election_id: election_id.to_string(),
            constituency_id: constituency_id.to_string(),
            candidate_id: candidate_id.to_string(),
            vote_count: 0,
            updated_at: None,
        }
    }

    /// Count one more vote.
    pub fn record_vote(&mut self, at: Timestamp) {
        self.vote_count += 1;
        self.updated_at = Some(at);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteResponse {
    pub vote_count: u64,
}
