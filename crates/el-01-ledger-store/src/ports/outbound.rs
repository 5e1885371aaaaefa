//! # Outbound Ports (Driven Ports)
//!
//! What the election components need from the ledger they run on.
//!
//! Production: the commit service of the host ledger.
//! Testing: [`InMemoryLedger`](crate::adapters::InMemoryLedger).

use crate::domain::{
    CommitReceipt, HistoryEntry, KeyRange, LedgerKey, ReadWriteSet, Version, VersionedValue,
};
use shared_types::{StoreError, Timestamp};

/// Committed key-value state plus per-key history.
///
/// Reads never block on writers for longer than a single commit. All
/// writes reach the store through [`commit`](LedgerStore::commit).
pub trait LedgerStore: Send + Sync {
    /// Current value of a key.
    fn get(&self, key: &LedgerKey) -> Result<Option<VersionedValue>, StoreError>;

    /// All keys in `range`, ordered by encoded key.
    fn range_scan(&self, range: &KeyRange)
        -> Result<Vec<(LedgerKey, VersionedValue)>, StoreError>;

    /// Every committed value of `key`, oldest first.
    fn history_scan(&self, key: &LedgerKey) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Version of the latest commit.
    fn current_version(&self) -> Result<Version, StoreError>;

    /// Validate the read set against current state and apply the write set.
    ///
    /// ## Atomicity
    ///
    /// Either every write in the set is applied at one new version, or none
    /// is. A stale read yields `MvccReadConflict`, a changed range yields
    /// `PhantomRead`.
    fn commit(&self, rw_set: ReadWriteSet) -> Result<CommitReceipt, StoreError>;
}

/// Source of transaction timestamps (for testability).
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
