//! # Permit Contract
//!
//! Owns `VoterRecord` (`VOTER` composite key) and `PermitRecord` (`PERMIT`
//! composite key). Issuance writes both in one transaction.

use crate::domain::{HasVotedResponse, IssuePermitResponse, PermitRecord, VoterRecord};
use crate::ports::{PermitIssuerApi, PermitRedeemer};
use el_01_ledger_store::{to_value, Contract, LedgerKey, Operation, TxContext};
use shared_types::{
    expect_args, permit_hash, require, ComponentId, ContractError, OperationMode,
};
use tracing::{debug, info, warn};

const PERMIT: &str = "permit";

/// Voter Permit Issuer.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermitContract;

impl PermitContract {
    pub fn new() -> Self {
        Self
    }
}

impl PermitIssuerApi for PermitContract {
    fn issue_permit(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        voter_hash: &str,
        permit_secret: &str,
    ) -> Result<IssuePermitResponse, ContractError> {
        let election_id = require("electionId", election_id)?;
        let voter_hash = require("voterHash", voter_hash)?;
        let permit_secret = require("permitSecret", permit_secret)?;
        let hash = permit_hash(permit_secret);

        let voter_key = LedgerKey::voter(election_id, voter_hash)?;
        if ctx.get_state(&voter_key)?.is_some() {
            return Err(ContractError::AlreadyIssued {
                election_id: election_id.to_string(),
            });
        }

        let permit_key = LedgerKey::permit(election_id, &hash)?;
        if ctx.get_state(&permit_key)?.is_some() {
            warn!(election_id, permit_hash = %hash, "Permit hash collision");
            return Err(ContractError::PermitCollision { permit_hash: hash });
        }

        let at = ctx.timestamp();
        ctx.put_json(
            &voter_key,
            &VoterRecord {
                election_id: election_id.to_string(),
                voter_hash: voter_hash.to_string(),
                issued_at: at,
            },
        )?;
        ctx.put_json(&permit_key, &PermitRecord::issue(election_id, &hash, at))?;

        info!(election_id, permit_hash = %hash, tx_id = %ctx.tx_id(), "Permit issued");
        Ok(IssuePermitResponse { permit_hash: hash })
    }

    fn has_voted(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        voter_hash: &str,
    ) -> Result<HasVotedResponse, ContractError> {
        let election_id = require("electionId", election_id)?;
        let voter_hash = require("voterHash", voter_hash)?;
        let key = LedgerKey::voter(election_id, voter_hash)?;
        let has = ctx.get_state(&key)?.is_some();
        Ok(HasVotedResponse { has })
    }

    fn get_permit_status(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        permit_hash: &str,
    ) -> Result<PermitRecord, ContractError> {
        let election_id = require("electionId", election_id)?;
        let permit_hash = require("permitHash", permit_hash)?;
        let key = LedgerKey::permit(election_id, permit_hash)?;
        ctx.get_json::<PermitRecord>(&key)?
            .ok_or_else(|| ContractError::not_found(PERMIT, permit_hash))
    }
}

impl PermitRedeemer for PermitContract {
    fn validate_and_spend_permit(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        permit_hash: &str,
    ) -> Result<PermitRecord, ContractError> {
        let election_id = require("electionId", election_id)?;
        let permit_hash = require("permitHash", permit_hash)?;
        let key = LedgerKey::permit(election_id, permit_hash)?;

        let mut permit = ctx
            .get_json::<PermitRecord>(&key)?
            .ok_or_else(|| ContractError::not_found(PERMIT, permit_hash))?;
        if let Err(err) = permit.spend(ctx.timestamp()) {
            debug!(election_id, permit_hash, "Permit already spent");
            return Err(err);
        }
        ctx.put_json(&key, &permit)?;

        info!(election_id, permit_hash, tx_id = %ctx.tx_id(), "Permit spent");
        Ok(permit)
    }
}

static OPERATIONS: &[Operation<PermitContract>] = &[
    Operation {
        name: "IssuePermit",
        mode: OperationMode::Mutating,
        handler: |c, ctx, args| {
            let [election_id, voter_hash, secret] = expect_args::<3>("IssuePermit", args)?;
            to_value(&c.issue_permit(ctx, election_id, voter_hash, secret)?)
        },
    },
    Operation {
        name: "HasVoted",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [election_id, voter_hash] = expect_args::<2>("HasVoted", args)?;
            to_value(&c.has_voted(ctx, election_id, voter_hash)?)
        },
    },
    Operation {
        name: "GetPermitStatus",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [election_id, hash] = expect_args::<2>("GetPermitStatus", args)?;
            to_value(&c.get_permit_status(ctx, election_id, hash)?)
        },
    },
];

impl Contract for PermitContract {
    const COMPONENT: ComponentId = ComponentId::Permit;

    fn operations() -> &'static [Operation<Self>] {
        OPERATIONS
    }
}
