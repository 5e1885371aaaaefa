//! Inbound Ports (Driving Ports / API)

use crate::domain::{CastVoteResponse, TallyRecord};
use el_01_ledger_store::TxContext;
use shared_types::ContractError;

/// Vote Tally Aggregator API.
pub trait VoteTallyApi: Send + Sync {
    /// Redeem a permit and count one vote, all in the caller's transaction.
    fn cast_vote(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        constituency_id: &str,
        candidate_id: &str,
        permit_secret: &str,
    ) -> Result<CastVoteResponse, ContractError>;

    /// Zero record if the candidate received no votes.
    fn get_candidate_tally(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        constituency_id: &str,
        candidate_id: &str,
    ) -> Result<TallyRecord, ContractError>;

    fn get_constituency_tallies(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        constituency_id: &str,
    ) -> Result<Vec<TallyRecord>, ContractError>;

    fn get_election_tallies(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<Vec<TallyRecord>, ContractError>;
}
