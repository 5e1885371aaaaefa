//! # el-02-election-lifecycle
//!
//! Election Lifecycle Manager.
//!
//! ## State Machine
//!
//! ```text
//! Initialize ──→ Initialized ──Start──→ Started ──Finish──→ Finished
//! ```
//!
//! `Finished` is terminal. Once any committed value of an election shows
//! `Finished`, `StartElection` is refused even if a stale write has reset
//! the current status.
//!
//! ## Dependents
//!
//! The Vote Tally Aggregator consumes [`ElectionStatusQuery`] to gate
//! voting (`is_started`) and result queries (`check_already_finished`).

pub mod contract;
pub mod domain;
pub mod ports;

pub use contract::ElectionContract;
pub use domain::*;
pub use ports::*;
