use crate::domain::{
    CommitReceipt, HistoryEntry, KeyRange, LedgerKey, ReadWriteSet, Version, VersionedValue,
};
use crate::ports::LedgerStore;
use parking_lot::RwLock;
use shared_types::StoreError;
use std::collections::BTreeMap;
use std::ops::Bound;
use tracing::{debug, warn};

#[derive(Default)]
struct KeyState {
    current: Option<VersionedValue>,
    history: Vec<HistoryEntry>,
}

#[derive(Default)]
struct LedgerState {
    keys: BTreeMap<LedgerKey, KeyState>,
    version: Version,
}

impl LedgerState {
    fn current_version_of(&self, key: &LedgerKey) -> Option<Version> {
        self.keys
            .get(key)
            .and_then(|state| state.current.as_ref())
            .map(|value| value.version)
    }

    fn scan(&self, range: &KeyRange) -> Vec<(LedgerKey, VersionedValue)> {
        let start = range.start();
        self.keys
            .range::<str, _>((Bound::Included(start.as_str()), Bound::Unbounded))
            .take_while(|(key, _)| range.contains(key))
            .filter_map(|(key, state)| state.current.clone().map(|value| (key.clone(), value)))
            .collect()
    }

    /// MVCC validation: every read version and every scanned range must be
    /// unchanged since simulation.
    fn validate(&self, rw_set: &ReadWriteSet) -> Result<(), StoreError> {
        for (key, observed) in &rw_set.reads {
            if self.current_version_of(key) != *observed {
                return Err(StoreError::MvccReadConflict {
                    key: key.to_string(),
                });
            }
        }

        for range_read in &rw_set.range_reads {
            let now: Vec<(LedgerKey, Version)> = self
                .scan(&range_read.range)
                .into_iter()
                .map(|(key, value)| (key, value.version))
                .collect();
            if now != range_read.observed {
                return Err(StoreError::PhantomRead {
                    prefix: range_read.range.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// In-memory ledger with MVCC commit validation and per-key history.
///
/// Stands in for the external commit service: commits are serialized by a
/// single write lock, simulations read concurrently.
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Number of keys with a current value.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .keys
            .values()
            .filter(|state| state.current.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedger {
    fn get(&self, key: &LedgerKey) -> Result<Option<VersionedValue>, StoreError> {
        let state = self.state.read();
        Ok(state.keys.get(key).and_then(|s| s.current.clone()))
    }

    fn range_scan(
        &self,
        range: &KeyRange,
    ) -> Result<Vec<(LedgerKey, VersionedValue)>, StoreError> {
        Ok(self.state.read().scan(range))
    }

    fn history_scan(&self, key: &LedgerKey) -> Result<Vec<HistoryEntry>, StoreError> {
        let state = self.state.read();
        Ok(state
            .keys
            .get(key)
            .map(|s| s.history.clone())
            .unwrap_or_default())
    }

    fn current_version(&self) -> Result<Version, StoreError> {
        Ok(self.state.read().version)
    }

    fn commit(&self, rw_set: ReadWriteSet) -> Result<CommitReceipt, StoreError> {
        let mut state = self.state.write();

        if let Err(err) = state.validate(&rw_set) {
            warn!(tx_id = %rw_set.tx_id, error = %err, "Commit rejected");
            return Err(err);
        }

        let version = state.version.next();
        let keys_written = rw_set.writes.len();
        for (key, value) in rw_set.writes {
            let entry = state.keys.entry(key).or_default();
            entry.history.push(HistoryEntry {
                tx_id: rw_set.tx_id,
                timestamp: rw_set.timestamp,
                version,
                value: value.clone(),
            });
            entry.current = Some(VersionedValue { value, version });
        }
        state.version = version;

        debug!(
            tx_id = %rw_set.tx_id,
            version = %version,
            keys_written,
            "Transaction committed"
        );

        Ok(CommitReceipt {
            tx_id: rw_set.tx_id,
            version,
            keys_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KeyKind, TxId};
    use crate::transaction::TxContext;
    use chrono::Utc;
    use shared_types::OperationMode;

    fn write(store: &InMemoryLedger, key: &LedgerKey, value: &[u8]) -> CommitReceipt {
        let mut tx = TxContext::new(store, TxId::new(), Utc::now(), OperationMode::Mutating);
        tx.get_state(key).unwrap();
        tx.put_state(key, value.to_vec()).unwrap();
        store.commit(tx.into_rw_set()).unwrap()
    }

    #[test]
    fn test_commit_and_history() {
        let store = InMemoryLedger::new();
        let key = LedgerKey::election("E1").unwrap();

        let first = write(&store, &key, b"initialized");
        let second = write(&store, &key, b"started");

        assert_eq!(first.version, Version(1));
        assert_eq!(second.version, Version(2));
        assert_eq!(store.get(&key).unwrap().unwrap().value, b"started");

        let history = store.history_scan(&key).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].value, b"initialized");
        assert_eq!(history[1].value, b"started");
    }

    #[test]
    fn test_stale_read_is_rejected() {
        let store = InMemoryLedger::new();
        let key = LedgerKey::permit("E1", "h1").unwrap();
        write(&store, &key, b"issued");

        let mut a = TxContext::new(&store, TxId::new(), Utc::now(), OperationMode::Mutating);
        let mut b = TxContext::new(&store, TxId::new(), Utc::now(), OperationMode::Mutating);
        a.get_state(&key).unwrap();
        b.get_state(&key).unwrap();
        a.put_state(&key, b"spent".to_vec()).unwrap();
        b.put_state(&key, b"spent".to_vec()).unwrap();

        assert!(store.commit(a.into_rw_set()).is_ok());
        assert_eq!(
            store.commit(b.into_rw_set()),
            Err(StoreError::MvccReadConflict {
                key: "PERMIT#E1#h1".into()
            })
        );
        assert_eq!(store.history_scan(&key).unwrap().len(), 2);
    }

    #[test]
    fn test_absent_read_conflicts_with_insert() {
        let store = InMemoryLedger::new();
        let key = LedgerKey::voter("E1", "v1").unwrap();

        let mut a = TxContext::new(&store, TxId::new(), Utc::now(), OperationMode::Mutating);
        let mut b = TxContext::new(&store, TxId::new(), Utc::now(), OperationMode::Mutating);
        assert!(a.get_state(&key).unwrap().is_none());
        assert!(b.get_state(&key).unwrap().is_none());
        a.put_state(&key, b"a".to_vec()).unwrap();
        b.put_state(&key, b"b".to_vec()).unwrap();

        store.commit(a.into_rw_set()).unwrap();
        assert!(store.commit(b.into_rw_set()).is_err());
        assert_eq!(store.get(&key).unwrap().unwrap().value, b"a");
    }

    #[test]
    fn test_phantom_read_is_rejected() {
        let store = InMemoryLedger::new();
        let range = KeyRange::partial(KeyKind::Tally, &["E1"]).unwrap();

        let mut scanner = TxContext::new(&store, TxId::new(), Utc::now(), OperationMode::Mutating);
        scanner.get_state_by_range(&range).unwrap();
        scanner
            .put_state(&LedgerKey::election("E2").unwrap(), b"x".to_vec())
            .unwrap();

        write(&store, &LedgerKey::tally("E1", "C1", "X").unwrap(), b"1");

        assert!(matches!(
            store.commit(scanner.into_rw_set()),
            Err(StoreError::PhantomRead { .. })
        ));
    }

    #[test]
    fn test_disjoint_transactions_both_commit() {
        let store = InMemoryLedger::new();
        let k1 = LedgerKey::tally("E1", "C1", "A").unwrap();
        let k2 = LedgerKey::tally("E1", "C1", "B").unwrap();

        let mut a = TxContext::new(&store, TxId::new(), Utc::now(), OperationMode::Mutating);
        let mut b = TxContext::new(&store, TxId::new(), Utc::now(), OperationMode::Mutating);
        a.get_state(&k1).unwrap();
        b.get_state(&k2).unwrap();
        a.put_state(&k1, b"1".to_vec()).unwrap();
        b.put_state(&k2, b"1".to_vec()).unwrap();

        assert!(store.commit(a.into_rw_set()).is_ok());
        assert!(store.commit(b.into_rw_set()).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_range_scan_is_ordered_and_scoped() {
        let store = InMemoryLedger::new();
        write(&store, &LedgerKey::tally("E1", "C2", "A").unwrap(), b"3");
        write(&store, &LedgerKey::tally("E1", "C1", "B").unwrap(), b"2");
        write(&store, &LedgerKey::tally("E1", "C1", "A").unwrap(), b"1");
        write(&store, &LedgerKey::tally("E10", "C1", "A").unwrap(), b"x");
        write(&store, &LedgerKey::election("E1").unwrap(), b"e");

        let c1 = KeyRange::partial(KeyKind::Tally, &["E1", "C1"]).unwrap();
        let values: Vec<_> = store
            .range_scan(&c1)
            .unwrap()
            .into_iter()
            .map(|(_, v)| v.value)
            .collect();
        assert_eq!(values, vec![b"1".to_vec(), b"2".to_vec()]);

        let e1 = KeyRange::partial(KeyKind::Tally, &["E1"]).unwrap();
        assert_eq!(store.range_scan(&e1).unwrap().len(), 3);

        let elections = store.range_scan(&KeyRange::elections()).unwrap();
        assert_eq!(elections.len(), 1);
    }
}
