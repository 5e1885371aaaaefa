//! Inbound Ports (Driving Ports / API)

use crate::domain::{ElectionHistoryEntry, ElectionRecord, ElectionResponse};
use el_01_ledger_store::TxContext;
use shared_types::ContractError;

/// Election Lifecycle Manager API.
///
/// Every method runs inside the caller's transaction context.
pub trait ElectionLifecycleApi: Send + Sync {
    /// Create an election in the `Initialized` phase.
    ///
    /// Fails with `AlreadyExists` if the name or the id is taken.
    fn initialize(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        election_name: &str,
    ) -> Result<ElectionResponse, ContractError>;

    fn start_election(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<ElectionResponse, ContractError>;

    fn finish_election(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<ElectionResponse, ContractError>;

    /// One current record per election, ordered by id.
    fn get_all_elections(
        &self,
        ctx: &mut TxContext<'_>,
    ) -> Result<Vec<ElectionRecord>, ContractError>;

    fn get_election(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<ElectionRecord, ContractError>;

    /// Committed values of the election record, oldest first.
    fn get_election_history(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<Vec<ElectionHistoryEntry>, ContractError>;
}

/// Phase checks other components run inside their own transactions.
pub trait ElectionStatusQuery: Send + Sync {
    /// True iff the current status is `Started`. Absent elections are not
    /// started.
    fn is_started(&self, ctx: &mut TxContext<'_>, election_id: &str)
        -> Result<bool, ContractError>;

    /// True iff any committed value of the election shows `Finished`.
    ///
    /// Scans the full history on every call.
    fn check_already_finished(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<bool, ContractError>;
}
