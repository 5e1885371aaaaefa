//! # Ledger Container
//!
//! Central container holding the ledger store, the clock and the three
//! components, wired through their typed interfaces.

pub mod config;
pub mod contracts;

pub use config::{ConfigError, RuntimeConfig};
pub use contracts::LedgerContainer;
