use super::keys::{KeyRange, LedgerKey};
use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Transaction identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId(pub Uuid);

impl TxId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Commit sequence number at which a key was last written.
///
/// Version 0 is the empty ledger; the first commit produces version 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(pub u64);

impl Version {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Current committed value of a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: Version,
}

/// One committed write to a key, as returned by a history scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub tx_id: TxId,
    pub timestamp: Timestamp,
    pub version: Version,
    pub value: Vec<u8>,
}

/// Keys observed by a range scan during simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeRead {
    pub range: KeyRange,
    pub observed: Vec<(LedgerKey, Version)>,
}

/// Everything a simulated transaction read and wants to write.
///
/// A read of an absent key is recorded as `None`, so a concurrent insert of
/// that key is also a conflict.
#[derive(Clone, Debug)]
pub struct ReadWriteSet {
    pub tx_id: TxId,
    pub timestamp: Timestamp,
    pub reads: BTreeMap<LedgerKey, Option<Version>>,
    pub range_reads: Vec<RangeRead>,
    pub writes: BTreeMap<LedgerKey, Vec<u8>>,
}

impl ReadWriteSet {
    pub fn new(tx_id: TxId, timestamp: Timestamp) -> Self {
        Self {
            tx_id,
            timestamp,
            reads: BTreeMap::new(),
            range_reads: Vec::new(),
            writes: BTreeMap::new(),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Result of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitReceipt {
    pub tx_id: TxId,
    pub version: Version,
    pub keys_written: usize,
}
