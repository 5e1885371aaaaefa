//! # el-01-ledger-store
//!
//! Ledger Store for the election ledger.
//!
//! ## Role in System
//!
//! - **Leaf dependency**: every component reads and writes through it
//! - **Typed keys**: `LedgerKey` replaces string-concatenated composite keys
//! - **Simulation / commit split**: `TxContext` records read and write sets,
//!   `LedgerStore::commit` validates them
//! - **History**: every key keeps an append-only log of committed values
//!
//! ## Transaction Flow
//!
//! ```text
//! operation ──→ TxContext (reads: key → version, writes buffered)
//!                   │
//!                   ↓
//!             ReadWriteSet ──→ LedgerStore::commit
//!                                   │
//!                     ┌─────────────┴─────────────┐
//!                     ↓                           ↓
//!          versions unchanged:             any read stale:
//!          apply all writes,               MvccReadConflict /
//!          append history                  PhantomRead, nothing applied
//! ```
//!
//! ## Concurrency
//!
//! No locks are held across a simulation. Two transactions touching a
//! common key cannot both commit; transactions with disjoint key sets
//! commit in either order.

pub mod adapters;
pub mod domain;
pub mod executor;
pub mod ports;
pub mod transaction;

pub use adapters::*;
pub use domain::*;
pub use executor::{execute, simulate, Proposal};
pub use ports::*;
pub use transaction::TxContext;
