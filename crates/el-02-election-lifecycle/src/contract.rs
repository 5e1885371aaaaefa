//! # Election Contract
//!
//! Owns `ElectionRecord` (simple key `electionId`) and the election-name
//! index (`ELECTION_NAME` composite key).
//!
//! Every transition reads the current election key before writing it, so
//! two concurrent transitions on the same election cannot both commit.

use crate::domain::{
    state_machine, ElectionHistoryEntry, ElectionNameEntry, ElectionRecord, ElectionResponse,
    ElectionStatus,
};
use crate::ports::{ElectionLifecycleApi, ElectionStatusQuery};
use el_01_ledger_store::{to_value, Contract, KeyRange, LedgerKey, Operation, TxContext};
use shared_types::{expect_args, require, ComponentId, ContractError, OperationMode};
use tracing::{debug, info};

const ENTITY: &str = "election";

/// Election Lifecycle Manager.
///
/// Stateless: everything it knows lives in the ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElectionContract;

impl ElectionContract {
    pub fn new() -> Self {
        Self
    }

    fn load(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<(LedgerKey, ElectionRecord), ContractError> {
        let key = LedgerKey::election(election_id)?;
        let record = ctx
            .get_json::<ElectionRecord>(&key)?
            .ok_or_else(|| ContractError::not_found(ENTITY, election_id))?;
        Ok((key, record))
    }

    fn history_shows_finished(
        &self,
        ctx: &TxContext<'_>,
        key: &LedgerKey,
    ) -> Result<bool, ContractError> {
        let history = ctx.history_json::<ElectionRecord>(key)?;
        Ok(history
            .iter()
            .any(|(_, record)| record.status == ElectionStatus::Finished))
    }
}

// =============================================================================
// LIFECYCLE API
// =============================================================================

impl ElectionLifecycleApi for ElectionContract {
    fn initialize(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
        election_name: &str,
    ) -> Result<ElectionResponse, ContractError> {
        let election_id = require("electionId", election_id)?;
        let election_name = require("electionName", election_name)?;

        let name_key = LedgerKey::election_name(election_name)?;
        if ctx.get_state(&name_key)?.is_some() {
            return Err(ContractError::AlreadyExists(format!(
                "election name {election_name}"
            )));
        }
        let key = LedgerKey::election(election_id)?;
        if ctx.get_state(&key)?.is_some() {
            return Err(ContractError::AlreadyExists(format!("election {election_id}")));
        }

        let record = ElectionRecord {
            election_id: election_id.to_string(),
            election_name: election_name.to_string(),
            status: ElectionStatus::Initialized,
            updated_at: ctx.timestamp(),
        };
        ctx.put_json(&key, &record)?;
        ctx.put_json(
            &name_key,
            &ElectionNameEntry {
                election_name: election_name.to_string(),
                election_id: election_id.to_string(),
            },
        )?;

        info!(election_id, election_name, tx_id = %ctx.tx_id(), "Election initialized");
        Ok(ElectionResponse::new(
            format!("Election {election_name} initialized"),
            record,
        ))
    }

    fn start_election(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<ElectionResponse, ContractError> {
        let election_id = require("electionId", election_id)?;
        let (key, mut record) = self.load(ctx, election_id)?;
        let finished_before = self.history_shows_finished(ctx, &key)?;

        record.status = state_machine::start(record.status, finished_before)
            .map_err(|refusal| refusal.into_error(election_id))?;
        record.updated_at = ctx.timestamp();
        ctx.put_json(&key, &record)?;

        info!(election_id, tx_id = %ctx.tx_id(), "Election started");
        Ok(ElectionResponse::new(
            format!("Election {election_id} started"),
            record,
        ))
    }

    fn finish_election(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<ElectionResponse, ContractError> {
        let election_id = require("electionId", election_id)?;
        let (key, mut record) = self.load(ctx, election_id)?;

        record.status = state_machine::finish(record.status)
            .map_err(|refusal| refusal.into_error(election_id))?;
        record.updated_at = ctx.timestamp();
        ctx.put_json(&key, &record)?;

        info!(election_id, tx_id = %ctx.tx_id(), "Election finished");
        Ok(ElectionResponse::new(
            format!("Election {election_id} finished"),
            record,
        ))
    }

    fn get_all_elections(
        &self,
        ctx: &mut TxContext<'_>,
    ) -> Result<Vec<ElectionRecord>, ContractError> {
        let records = ctx.range_json::<ElectionRecord>(&KeyRange::elections())?;
        debug!(count = records.len(), "Listed elections");
        Ok(records)
    }

    fn get_election(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<ElectionRecord, ContractError> {
        let election_id = require("electionId", election_id)?;
        self.load(ctx, election_id).map(|(_, record)| record)
    }

    fn get_election_history(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<Vec<ElectionHistoryEntry>, ContractError> {
        let election_id = require("electionId", election_id)?;
        let key = LedgerKey::election(election_id)?;
        let history = ctx.history_json::<ElectionRecord>(&key)?;
        if history.is_empty() {
            return Err(ContractError::not_found(ENTITY, election_id));
        }
        Ok(history
            .into_iter()
            .map(|(entry, record)| ElectionHistoryEntry::new(entry, record))
            .collect())
    }
}

// =============================================================================
// CROSS-COMPONENT QUERIES
// =============================================================================

impl ElectionStatusQuery for ElectionContract {
    fn is_started(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<bool, ContractError> {
        let election_id = require("electionId", election_id)?;
        let key = LedgerKey::election(election_id)?;
        let started = ctx
            .get_json::<ElectionRecord>(&key)?
            .is_some_and(|record| record.status == ElectionStatus::Started);
        debug!(election_id, started, "Checked election status");
        Ok(started)
    }

    fn check_already_finished(
        &self,
        ctx: &mut TxContext<'_>,
        election_id: &str,
    ) -> Result<bool, ContractError> {
        let election_id = require("electionId", election_id)?;
        let key = LedgerKey::election(election_id)?;
        self.history_shows_finished(ctx, &key)
    }
}

// =============================================================================
// OPERATION TABLE
// =============================================================================

static OPERATIONS: &[Operation<ElectionContract>] = &[
    Operation {
        name: "Initialize",
        mode: OperationMode::Mutating,
        handler: |c, ctx, args| {
            let [id, name] = expect_args::<2>("Initialize", args)?;
            to_value(&c.initialize(ctx, id, name)?)
        },
    },
    Operation {
        name: "StartElection",
        mode: OperationMode::Mutating,
        handler: |c, ctx, args| {
            let [id] = expect_args::<1>("StartElection", args)?;
            to_value(&c.start_election(ctx, id)?)
        },
    },
    Operation {
        name: "FinishElection",
        mode: OperationMode::Mutating,
        handler: |c, ctx, args| {
            let [id] = expect_args::<1>("FinishElection", args)?;
            to_value(&c.finish_election(ctx, id)?)
        },
    },
    Operation {
        name: "getAllElections",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [] = expect_args::<0>("getAllElections", args)?;
            to_value(&c.get_all_elections(ctx)?)
        },
    },
    Operation {
        name: "isStarted",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [id] = expect_args::<1>("isStarted", args)?;
            to_value(&c.is_started(ctx, id)?)
        },
    },
    Operation {
        name: "checkAlreadyFinished",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [id] = expect_args::<1>("checkAlreadyFinished", args)?;
            to_value(&c.check_already_finished(ctx, id)?)
        },
    },
    Operation {
        name: "GetElection",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [id] = expect_args::<1>("GetElection", args)?;
            to_value(&c.get_election(ctx, id)?)
        },
    },
    Operation {
        name: "GetElectionHistory",
        mode: OperationMode::ReadOnly,
        handler: |c, ctx, args| {
            let [id] = expect_args::<1>("GetElectionHistory", args)?;
            to_value(&c.get_election_history(ctx, id)?)
        },
    },
];

impl Contract for ElectionContract {
    const COMPONENT: ComponentId = ComponentId::Election;

    fn operations() -> &'static [Operation<Self>] {
        OPERATIONS
    }
}
