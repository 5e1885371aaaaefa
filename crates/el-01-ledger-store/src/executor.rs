//! # Transaction Executor
//!
//! Runs one operation as an atomic unit:
//!
//! 1. Open a [`TxContext`] with a fresh tx id and the clock's timestamp
//! 2. Simulate the operation against committed state
//! 3. On error, drop the context (no side effects)
//! 4. For mutating operations, commit the read/write set
//!
//! Read-only operations are never committed.

use crate::domain::{CommitReceipt, ReadWriteSet, TxId};
use crate::ports::{Clock, LedgerStore};
use crate::transaction::TxContext;
use shared_types::{ContractError, OperationMode};

/// A simulated transaction waiting for commit.
#[derive(Debug)]
pub struct Proposal<T> {
    pub output: T,
    pub rw_set: ReadWriteSet,
}

/// Simulate `op` without committing.
pub fn simulate<T>(
    store: &dyn LedgerStore,
    clock: &dyn Clock,
    mode: OperationMode,
    op: impl FnOnce(&mut TxContext<'_>) -> Result<T, ContractError>,
) -> Result<Proposal<T>, ContractError> {
    let mut ctx = TxContext::new(store, TxId::new(), clock.now(), mode);
    let output = op(&mut ctx)?;
    Ok(Proposal {
        output,
        rw_set: ctx.into_rw_set(),
    })
}

/// Simulate `op` and, if it is mutating and succeeded, commit it.
pub fn execute<T>(
    store: &dyn LedgerStore,
    clock: &dyn Clock,
    mode: OperationMode,
    op: impl FnOnce(&mut TxContext<'_>) -> Result<T, ContractError>,
) -> Result<(T, Option<CommitReceipt>), ContractError> {
    let proposal = simulate(store, clock, mode, op)?;
    if mode.is_read_only() {
        return Ok((proposal.output, None));
    }
    let receipt = store.commit(proposal.rw_set)?;
    Ok((proposal.output, Some(receipt)))
}
