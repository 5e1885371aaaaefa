//! Inbound Ports (Driving Ports / API)

use crate::domain::{HasVotedResponse, IssuePermitResponse, PermitRecord};
use el_01_ledger_store::TxContext;
use shared_types::ContractError;

/// Voter Permit Issuer API, reachable through the operation table.
pub trait PermitIssuerApi: Send + Sync {
    /// Issue the single permit a voter may hold for an election.
    ///
    /// The secret is hashed on entry and never stored or logged.
    fn issue_permit(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        voter_hash: &str,
        permit_secret: &str,
    ) -> Result<IssuePermitResponse, ContractError>;

    fn has_voted(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        voter_hash: &str,
    ) -> Result<HasVotedResponse, ContractError>;

    fn get_permit_status(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        permit_hash: &str,
    ) -> Result<PermitRecord, ContractError>;
}

/// Permit redemption for the Vote Tally Aggregator.
///
/// Not exposed as a named operation.
pub trait PermitRedeemer: Send + Sync {
    /// Flip a permit from `Issued` to `Spent` inside the caller's
    /// transaction. The permit key is read before it is written, so two
    /// concurrent redemptions cannot both commit.
    fn validate_and_spend_permit(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        permit_hash: &str,
    ) -> Result<PermitRecord, ContractError>;
}
