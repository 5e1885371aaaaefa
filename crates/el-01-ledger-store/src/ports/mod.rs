//! Ports module for the Ledger Store
//!
//! Defines inbound (operation tables) and outbound (store, clock) traits.

pub mod inbound;
pub mod outbound;

pub use inbound::{to_value, Contract, Dispatch, Handler, Operation};
pub use outbound::{Clock, LedgerStore};
