//! # Gateway
//!
//! Client side of the commit service.
//!
//! ```text
//! submit ──→ simulate ──→ commit ──→ Ok(result)
//!               │            │
//!               │            └── MvccReadConflict / PhantomRead
//!               │                    └──→ re-simulate (≤ max_commit_retries)
//!               └── ContractError ──→ Err, never retried
//!
//! evaluate ──→ simulate (read-only) ──→ Ok(result), nothing committed
//! ```
//!
//! Re-simulation re-runs every check against fresh state, so the loser of a
//! race on a permit comes back as `AlreadySpent` rather than a conflict.

use std::sync::Arc;

use el_01_ledger_store::{execute, simulate, Dispatch, LedgerStore};
use ledger_telemetry::{
    log_tx_event, metric_inc, COMMIT_CONFLICTS, COMMIT_RETRIES, PERMITS_ISSUED, PERMITS_SPENT,
    TRANSACTIONS_COMMITTED, TRANSACTIONS_REJECTED, VOTES_CAST,
};
use serde_json::Value;
use shared_types::{ComponentId, ContractError, ErrorKind, OperationMode, StoreError};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::container::LedgerContainer;

/// Gateway errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The operation itself failed, or its commit failed for a reason that
    /// re-simulation cannot fix.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Every attempt lost a commit race.
    #[error("commit rejected after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: StoreError },
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Contract(err) => err.kind(),
            Self::RetriesExhausted { .. } => ErrorKind::Unavailable,
        }
    }
}

/// Routes named operations to components and drives their transactions.
#[derive(Clone)]
pub struct Gateway {
    container: Arc<LedgerContainer>,
}

impl Gateway {
    pub fn new(container: Arc<LedgerContainer>) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &LedgerContainer {
        &self.container
    }

    /// Submit or evaluate, depending on the operation's mode.
    pub fn invoke(
        &self,
        component: &str,
        function: &str,
        args: &[String],
    ) -> Result<Value, GatewayError> {
        let (contract, mode) = self.resolve(component, function)?;
        match mode {
            OperationMode::Mutating => self.submit_to(contract, function, args),
            OperationMode::ReadOnly => self.evaluate_on(contract, function, args),
        }
    }

    /// Simulate and commit a mutating operation.
    #[instrument(skip(self, args), fields(args = args.len()))]
    pub fn submit(
        &self,
        component: &str,
        function: &str,
        args: &[String],
    ) -> Result<Value, GatewayError> {
        let (contract, mode) = self.resolve(component, function)?;
        if mode.is_read_only() {
            return Err(ContractError::Validation(format!(
                "{function} is read-only; evaluate it instead"
            ))
            .into());
        }
        self.submit_to(contract, function, args)
    }

    /// Simulate a read-only operation without committing.
    #[instrument(skip(self, args), fields(args = args.len()))]
    pub fn evaluate(
        &self,
        component: &str,
        function: &str,
        args: &[String],
    ) -> Result<Value, GatewayError> {
        let (contract, mode) = self.resolve(component, function)?;
        if !mode.is_read_only() {
            return Err(ContractError::Validation(format!(
                "{function} modifies the ledger; submit it instead"
            ))
            .into());
        }
        self.evaluate_on(contract, function, args)
    }

    fn resolve(
        &self,
        component: &str,
        function: &str,
    ) -> Result<(&dyn Dispatch, OperationMode), GatewayError> {
        let id: ComponentId = component.parse()?;
        let contract = self.container.contract(id);
        let mode = contract
            .mode_of(function)
            .ok_or_else(|| ContractError::UnknownOperation {
                component: id.to_string(),
                function: function.to_string(),
            })?;
        Ok((contract, mode))
    }

    fn submit_to(
        &self,
        contract: &dyn Dispatch,
        function: &str,
        args: &[String],
    ) -> Result<Value, GatewayError> {
        let component = contract.component();
        let store = self.container.store.as_ref();
        let max_retries = self.container.config.max_commit_retries;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let proposal = simulate(
                store,
                self.container.clock.as_ref(),
                OperationMode::Mutating,
                |ctx| contract.dispatch(function, ctx, args),
            )
            .map_err(|err| self.rejected(component, err))?;

            let tx_id = proposal.rw_set.tx_id;
            match store.commit(proposal.rw_set) {
                Ok(receipt) => {
                    record_commit(component, function);
                    log_tx_event!(
                        info,
                        component,
                        function,
                        tx_id,
                        "Transaction committed",
                        version = %receipt.version,
                        attempt
                    );
                    return Ok(proposal.output);
                }
                Err(err) if err.is_retryable() => {
                    metric_inc!(COMMIT_CONFLICTS);
                    if attempt > max_retries {
                        warn!(%component, function, attempt, error = %err, "Giving up after commit conflicts");
                        metric_inc!(
                            TRANSACTIONS_REJECTED,
                            &[component.as_str(), ErrorKind::Unavailable.as_str()]
                        );
                        return Err(GatewayError::RetriesExhausted {
                            attempts: attempt,
                            last: err,
                        });
                    }
                    metric_inc!(COMMIT_RETRIES);
                    debug!(%component, function, attempt, error = %err, "Re-simulating");
                }
                Err(err) => return Err(self.rejected(component, err.into()).into()),
            }
        }
    }

    fn evaluate_on(
        &self,
        contract: &dyn Dispatch,
        function: &str,
        args: &[String],
    ) -> Result<Value, GatewayError> {
        let component = contract.component();
        let (output, _) = execute(
            self.container.store.as_ref(),
            self.container.clock.as_ref(),
            OperationMode::ReadOnly,
            |ctx| contract.dispatch(function, ctx, args),
        )
        .map_err(|err| self.rejected(component, err))?;
        Ok(output)
    }

    fn rejected(&self, component: ComponentId, err: ContractError) -> ContractError {
        metric_inc!(TRANSACTIONS_REJECTED, &[component.as_str(), err.kind().as_str()]);
        debug!(%component, kind = %err.kind(), error = %err, "Operation rejected");
        err
    }
}

fn record_commit(component: ComponentId, function: &str) {
    metric_inc!(TRANSACTIONS_COMMITTED, &[component.as_str(), function]);
    match (component, function) {
        (ComponentId::Permit, "IssuePermit") => metric_inc!(PERMITS_ISSUED),
        (ComponentId::Tally, "CastVote") => {
            metric_inc!(VOTES_CAST);
            metric_inc!(PERMITS_SPENT);
        }
        _ => {}
    }
}
