//! # Tally Contract
//!
//! Owns `TallyRecord` (`TALLY` composite key). Votes for different
//! (election, constituency, candidate) triples touch disjoint keys and
//! commit independently.
//!
//! ## CastVote
//!
//! ```text
//! is_started ──→ validate_and_spend_permit ──→ read tally ──→ write tally
//!     │                    │
//!     ↓                    ↓
//! ElectionNotActive   NotFound / AlreadySpent (verbatim)
//! ```
//!
//! All steps share one transaction: any failure discards every write,
//! including the permit spend.

use crate::domain::{CastVoteResponse, TallyRecord};
use crate::ports::VoteTallyApi;
use el_01_ledger_store::{
    to_value, Contract, KeyKind, KeyRange, LedgerKey, Operation, TxContext,
};
use el_02_election_lifecycle::ElectionStatusQuery;
use el_03_voter_permit::PermitRedeemer;
use shared_types::{
    expect_args, permit_hash, require, ComponentId, ContractError, OperationMode,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Vote Tally Aggregator.
pub struct TallyContract {
    elections: Arc<dyn ElectionStatusQuery>,
    permits: Arc<dyn PermitRedeemer>,
}

impl TallyContract {
    pub fn new(elections: Arc<dyn ElectionStatusQuery>, permits: Arc<dyn PermitRedeemer>) -> Self {
        Self { elections, permits }
    }

    /// Results stay sealed until the election's history shows `Finished`.
    fn require_finished(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<(), ContractError> {
        if self.elections.check_already_finished(ctx, election_id)? {
            Ok(())
        } else {
            Err(ContractError::NotFinished(election_id.to_string()))
        }
    }
}

impl VoteTallyApi for TallyContract {
    fn cast_vote(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        constituency_id: &str,
        candidate_id: &str,
        permit_secret: &str,
    ) -> Result<CastVoteResponse, ContractError> {
        let election_id = require("electionId", election_id)?;
        let constituency_id = require("constituencyId", constituency_id)?;
        let candidate_id = require("candidateId", candidate_id)?;
        let permit_secret = require("permitSecret", permit_secret)?;
        let key = LedgerKey::tally(election_id, constituency_id, candidate_id)?;

        if !self.elections.is_started(ctx, election_id)? {
            return Err(ContractError::ElectionNotActive(election_id.to_string()));
        }

        let hash = permit_hash(permit_secret);
        self.permits.validate_and_spend_permit(ctx, election_id, &hash)?;

        let mut tally = ctx
            .get_json::<TallyRecord>(&key)?
            .unwrap_or_else(|| TallyRecord::zero(election_id, constituency_id, candidate_id));
        tally.record_vote(ctx.timestamp());
        ctx.put_json(&key, &tally)?;

        info!(
            election_id,
            constituency_id,
            candidate_id,
            vote_count = tally.vote_count,
            tx_id = %ctx.tx_id(),
            "Vote cast"
        );
        Ok(CastVoteResponse {
            vote_count: tally.vote_count,
        })
    }

    fn get_candidate_tally(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        constituency_id: &str,
        candidate_id: &str,
    ) -> Result<TallyRecord, ContractError> {
        let election_id = require("electionId", election_id)?;
        let constituency_id = require("constituencyId", constituency_id)?;
        let candidate_id = require("candidateId", candidate_id)?;
        let key = LedgerKey::tally(election_id, constituency_id, candidate_id)?;
        self.require_finished(ctx, election_id)?;

        Ok(ctx
            .get_json::<TallyRecord>(&key)?
            .unwrap_or_else(|| TallyRecord::zero(election_id, constituency_id, candidate_id)))
    }

    fn get_constituency_tallies(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        constituency_id: &str,
    ) -> Result<Vec<TallyRecord>, ContractError> {
        let election_id = require("electionId", election_id)?;
        let constituency_id = require("constituencyId", constituency_id)?;
        let range = KeyRange::partial(KeyKind::Tally, &[election_id, constituency_id])?;
        self.require_finished(ctx, election_id)?;

        let tallies = ctx.range_json::<TallyRecord>(&range)?;
        debug!(election_id, constituency_id, count = tallies.len(), "Scanned constituency");
        Ok(tallies)
    }

    fn get_election_tallies(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<Vec<TallyRecord>, ContractError> {
        let election_id = require("electionId", election_id)?;
        let range = KeyRange::partial(KeyKind::Tally, &[election_id])?;
        self.require_finished(ctx, election_id)?;

        let tallies = ctx.range_json::<TallyRecord>(&range)?;
        debug!(election_id, count = tallies.len(), "Scanned election");
        Ok(tallies)
    }
}

static OPERATIONS: &[Operation<TallyContract>] = &[
    Operation {
        name: "CastVote",
        mode: OperationMode::Mutating,
        handler: |c, ctx, args| {
            let [election, constituency, candidate, secret] = expect_args::<4>("CastVote", args)?;
            to_value(&c.cast_vote(ctx, election, constituency, candidate, secret)?)
        },
    },
    Operation {
        name: "GetCandidateTally",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [election, constituency, candidate] =
                expect_args::<3>("GetCandidateTally", args)?;
            to_value(&c.get_candidate_tally(ctx, election, constituency, candidate)?)
        },
    },
    Operation {
        name: "GetConstituencyTallies",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [election, constituency] = expect_args::<2>("GetConstituencyTallies", args)?;
            to_value(&c.get_constituency_tallies(ctx, election, constituency)?)
        },
    },
    Operation {
        name: "GetElectionTallies",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [election] = expect_args::<1>("GetElectionTallies", args)?;
            to_value(&c.get_election_tallies(ctx, election)?)
        },
    },
];

impl Contract for TallyContract {
    const COMPONENT: ComponentId = ComponentId::Tally;

    fn operations() -> &'static [Operation<Self>] {
        OPERATIONS
    }
}
