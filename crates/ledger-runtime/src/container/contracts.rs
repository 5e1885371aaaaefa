//! # Component Wiring
//!
//! ```text
//! Level 0: Ledger Store, Clock (no dependencies)
//! Level 1: Election Lifecycle Manager, Voter Permit Issuer
//! Level 2: Vote Tally Aggregator (ElectionStatusQuery + PermitRedeemer)
//! ```
//!
//! Components are stateless; all state lives in the ledger store, so the
//! container is shared freely across threads.

use std::sync::Arc;

use el_01_ledger_store::{Clock, Dispatch, InMemoryLedger, SystemClock};
use el_02_election_lifecycle::ElectionContract;
use el_03_voter_permit::PermitContract;
use el_04_vote_tally::TallyContract;
use shared_types::ComponentId;
use tracing::{info, instrument};

use crate::container::config::RuntimeConfig;

/// Central container holding all component instances.
pub struct LedgerContainer {
    // =========================================================================
    // LEVEL 0
    // =========================================================================
    /// Reference ledger with MVCC commit validation.
    pub store: Arc<InMemoryLedger>,

    /// Source of transaction timestamps.
    pub clock: Arc<dyn Clock>,

    // =========================================================================
    // LEVEL 1
    // =========================================================================
    pub elections: Arc<ElectionContract>,

    pub permits: Arc<PermitContract>,

    // =========================================================================
    // LEVEL 2
    // =========================================================================
    pub tally: Arc<TallyContract>,

    /// Runtime configuration (immutable after initialization).
    pub config: RuntimeConfig,
}

impl LedgerContainer {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build the container with an explicit clock.
    #[instrument(name = "ledger_init", skip(config, clock))]
    pub fn with_clock(config: RuntimeConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(InMemoryLedger::new());

        let elections = Arc::new(ElectionContract::new());
        let permits = Arc::new(PermitContract::new());
        let tally = Arc::new(TallyContract::new(elections.clone(), permits.clone()));

        info!(
            channel = %config.channel_name,
            max_commit_retries = config.max_commit_retries,
            "Ledger container ready"
        );

        Self {
            store,
            clock,
            elections,
            permits,
            tally,
            config,
        }
    }

    /// Operation table of a component.
    pub fn contract(&self, component: ComponentId) -> &dyn Dispatch {
        match component {
            ComponentId::Election => self.elections.as_ref(),
            ComponentId::Permit => self.permits.as_ref(),
            ComponentId::Tally => self.tally.as_ref(),
        }
    }
}
