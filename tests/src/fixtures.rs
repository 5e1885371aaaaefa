//! Shared fixtures: a gateway over a fresh ledger with a manual clock.

use std::sync::Arc;

use el_01_ledger_store::ManualClock;
use ledger_runtime::{Gateway, GatewayError, LedgerContainer, RuntimeConfig};
use serde_json::Value;

pub struct TestLedger {
    pub gateway: Gateway,
    pub clock: Arc<ManualClock>,
}

impl TestLedger {
    pub fn new() -> Self {
        Self::with_retries(RuntimeConfig::default().max_commit_retries)
    }

    pub fn with_retries(max_commit_retries: u32) -> Self {
        let config = RuntimeConfig {
            max_commit_retries,
            ..RuntimeConfig::default()
        };
        let clock = Arc::new(ManualClock::default());
        let container = LedgerContainer::with_clock(config, clock.clone());
        Self {
            gateway: Gateway::new(Arc::new(container)),
            clock,
        }
    }

    pub fn call(&self, component: &str, function: &str, args: &[&str]) -> Result<Value, GatewayError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.gateway.invoke(component, function, &args)
    }

    /// Initialize and start an election.
    pub fn started(election_id: &str, election_name: &str) -> Self {
        let ledger = Self::new();
        ledger.open(election_id, election_name);
        ledger
    }

    pub fn open(&self, election_id: &str, election_name: &str) {
        self.call("election", "Initialize", &[election_id, election_name])
            .expect("initialize");
        self.call("election", "StartElection", &[election_id])
            .expect("start");
    }

    pub fn issue(&self, election_id: &str, voter_hash: &str, secret: &str) -> String {
        let out = self
            .call("permit", "IssuePermit", &[election_id, voter_hash, secret])
            .expect("issue permit");
        out["permitHash"].as_str().unwrap_or_default().to_string()
    }
}

impl Default for TestLedger {
    fn default() -> Self {
        Self::new()
    }
}
