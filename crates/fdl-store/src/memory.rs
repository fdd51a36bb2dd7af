use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use fdl_types::DepositDate;

use crate::error::{StoreError, StoreResult};
use crate::traits::{CounterStore, SnapshotStore};

/// In-memory snapshot holder.
///
/// Intended for tests and embedding. Writes can be switched off with
/// [`InMemorySnapshotStore::set_read_only`] to exercise persistence-failure
/// paths.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshot: RwLock<Option<Vec<u8>>>,
    read_only: AtomicBool,
    writes: AtomicUsize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given snapshot bytes already present.
    pub fn with_snapshot(bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        *store.snapshot.write().expect("lock poisoned") = Some(bytes.into());
        store
    }

    /// Make subsequent writes fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current snapshot bytes.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.snapshot.read().expect("lock poisoned").clone()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }
        *self.snapshot.write().expect("lock poisoned") = Some(bytes.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

impl std::fmt::Debug for InMemorySnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySnapshotStore")
            .field("writes", &self.write_count())
            .finish()
    }
}

/// In-memory per-day counters, kept as raw text so corrupt values can be
/// planted in tests.
#[derive(Default)]
pub struct InMemoryCounterStore {
    counters: RwLock<HashMap<DepositDate, String>>,
    read_only: AtomicBool,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the raw stored text for `date`.
    pub fn set_raw(&self, date: DepositDate, raw: impl Into<String>) {
        self.counters
            .write()
            .expect("lock poisoned")
            .insert(date, raw.into());
    }

    /// Make subsequent writes fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl CounterStore for InMemoryCounterStore {
    fn read(&self, date: DepositDate) -> StoreResult<Option<u64>> {
        let map = self.counters.read().expect("lock poisoned");
        let Some(raw) = map.get(&date) else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|_| StoreError::InvalidCounter {
                date: date.to_string(),
                raw: raw.clone(),
            })
    }

    fn write(&self, date: DepositDate, value: u64) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }
        self.set_raw(date, value.to_string());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryCounterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let days = self.counters.read().expect("lock poisoned").len();
        f.debug_struct("InMemoryCounterStore")
            .field("days", &days)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DepositDate {
        DepositDate::from_ymd(2025, 11, 27).unwrap()
    }

    #[test]
    fn snapshot_starts_empty() {
        let store = InMemorySnapshotStore::new();
        assert!(store.read().unwrap().is_none());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn snapshot_write_replaces() {
        let store = InMemorySnapshotStore::with_snapshot("old");
        store.write(b"new").unwrap();
        assert_eq!(store.read().unwrap().unwrap(), b"new");
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn read_only_snapshot_rejects_writes() {
        let store = InMemorySnapshotStore::with_snapshot("keep");
        store.set_read_only(true);
        assert!(matches!(store.write(b"lost"), Err(StoreError::ReadOnly)));
        assert_eq!(store.contents().unwrap(), b"keep");

        store.set_read_only(false);
        store.write(b"ok").unwrap();
        assert_eq!(store.contents().unwrap(), b"ok");
    }

    #[test]
    fn counter_roundtrip() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.read(date()).unwrap(), None);
        store.write(date(), 4).unwrap();
        assert_eq!(store.read(date()).unwrap(), Some(4));
    }

    #[test]
    fn planted_garbage_counter_is_an_error() {
        let store = InMemoryCounterStore::new();
        store.set_raw(date(), "??");
        assert!(matches!(
            store.read(date()),
            Err(StoreError::InvalidCounter { .. })
        ));
    }

    #[test]
    fn read_only_counter_rejects_writes() {
        let store = InMemoryCounterStore::new();
        store.set_read_only(true);
        assert!(matches!(store.write(date(), 1), Err(StoreError::ReadOnly)));
        assert_eq!(store.read(date()).unwrap(), None);
    }
}
