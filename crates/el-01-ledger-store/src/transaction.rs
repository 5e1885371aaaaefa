//! # Transaction Context
//!
//! The simulation side of a transaction. A [`TxContext`] reads committed
//! state through the [`LedgerStore`], records the version of every key it
//! looks at, and buffers writes. Nothing reaches the store until the caller
//! hands [`TxContext::into_rw_set`] to `commit`.
//!
//! ## Read discipline
//!
//! - The first observation of a key fixes its version in the read set.
//! - Reads see this transaction's own pending writes.
//! - History scans return committed entries only and are not recorded;
//!   history is append-only so a stale scan can only miss newer entries.

use crate::domain::{HistoryEntry, KeyRange, LedgerKey, RangeRead, ReadWriteSet, TxId};
use crate::ports::LedgerStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{OperationMode, StoreError, Timestamp};
use std::collections::BTreeMap;
use tracing::trace;

/// Per-transaction view of the ledger.
pub struct TxContext<'a> {
    store: &'a dyn LedgerStore,
    mode: OperationMode,
    rw_set: ReadWriteSet,
}

impl<'a> TxContext<'a> {
    pub fn new(
        store: &'a dyn LedgerStore,
        tx_id: TxId,
        timestamp: Timestamp,
        mode: OperationMode,
    ) -> Self {
        Self {
            store,
            mode,
            rw_set: ReadWriteSet::new(tx_id, timestamp),
        }
    }

    pub fn tx_id(&self) -> TxId {
        self.rw_set.tx_id
    }

    /// Deterministic timestamp of this transaction.
    pub fn timestamp(&self) -> Timestamp {
        self.rw_set.timestamp
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    /// Read a key, recording it in the read set.
    pub fn get_state(&mut self, key: &LedgerKey) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(pending) = self.rw_set.writes.get(key) {
            return Ok(Some(pending.clone()));
        }

        let current = self.store.get(key)?;
        let version = current.as_ref().map(|v| v.version);
        self.rw_set.reads.entry(key.clone()).or_insert(version);
        trace!(tx_id = %self.tx_id(), key = %key, ?version, "get_state");
        Ok(current.map(|v| v.value))
    }

    /// Buffer a write.
    pub fn put_state(&mut self, key: &LedgerKey, value: Vec<u8>) -> Result<(), StoreError> {
        if self.mode.is_read_only() {
            return Err(StoreError::ReadOnlyTransaction);
        }
        trace!(tx_id = %self.tx_id(), key = %key, bytes = value.len(), "put_state");
        self.rw_set.writes.insert(key.clone(), value);
        Ok(())
    }

    /// Scan a key range, merged with this transaction's pending writes.
    pub fn get_state_by_range(
        &mut self,
        range: &KeyRange,
    ) -> Result<Vec<(LedgerKey, Vec<u8>)>, StoreError> {
        let committed = self.store.range_scan(range)?;
        self.rw_set.range_reads.push(RangeRead {
            range: range.clone(),
            observed: committed
                .iter()
                .map(|(key, value)| (key.clone(), value.version))
                .collect(),
        });

        let mut merged: BTreeMap<LedgerKey, Vec<u8>> = committed
            .into_iter()
            .map(|(key, value)| (key, value.value))
            .collect();
        for (key, value) in &self.rw_set.writes {
            if range.contains(key) {
                merged.insert(key.clone(), value.clone());
            }
        }
        Ok(merged.into_iter().collect())
    }

    /// Committed history of a key, oldest first.
    pub fn get_history_for_key(&self, key: &LedgerKey) -> Result<Vec<HistoryEntry>, StoreError> {
        self.store.history_scan(key)
    }

    pub fn get_json<T: DeserializeOwned>(
        &mut self,
        key: &LedgerKey,
    ) -> Result<Option<T>, StoreError> {
        match self.get_state(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put_json<T: Serialize>(&mut self, key: &LedgerKey, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.put_state(key, bytes)
    }

    pub fn range_json<T: DeserializeOwned>(
        &mut self,
        range: &KeyRange,
    ) -> Result<Vec<T>, StoreError> {
        self.get_state_by_range(range)?
            .into_iter()
            .map(|(_, bytes)| serde_json::from_slice(&bytes).map_err(StoreError::from))
            .collect()
    }

    /// Decoded history of a key. An entry that fails to decode is an error.
    pub fn history_json<T: DeserializeOwned>(
        &self,
        key: &LedgerKey,
    ) -> Result<Vec<(HistoryEntry, T)>, StoreError> {
        self.get_history_for_key(key)?
            .into_iter()
            .map(|entry| {
                let value = serde_json::from_slice(&entry.value)?;
                Ok((entry, value))
            })
            .collect()
    }

    pub fn rw_set(&self) -> &ReadWriteSet {
        &self.rw_set
    }

    pub fn into_rw_set(self) -> ReadWriteSet {
        self.rw_set
    }
}
