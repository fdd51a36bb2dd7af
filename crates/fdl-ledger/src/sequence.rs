use fdl_store::{CounterStore, StoreError};
use fdl_types::{DepositDate, DepositId};
use tracing::{debug, warn};

use crate::error::LedgerResult;

/// Issues per-day deposit ids of the form `YYYYMMDDnnn`.
///
/// Each day has its own persisted counter holding the last issued sequence
/// number; a day without a counter starts at zero, so its first id ends in
/// `001`. The counter is re-read on every call. Sequences past 999 widen the
/// suffix instead of wrapping.
///
/// Not safe for concurrent allocation from more than one writer: two
/// read-increment-write cycles can interleave and issue the same id.
pub struct SequenceAllocator {
    store: Box<dyn CounterStore>,
}

impl SequenceAllocator {
    pub fn new(store: Box<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Reserve the next id for `date`.
    ///
    /// The incremented counter is persisted before the id is returned, so a
    /// crash afterwards leaves a gap rather than a duplicate. An unreadable
    /// counter is treated as zero.
    pub fn allocate(&self, date: DepositDate) -> LedgerResult<Reservation<'_>> {
        let last = self.last_issued(date);
        let issued = last + 1;
        self.store.write(date, issued)?;

        let id = DepositId::compose(date, issued);
        debug!(%id, "deposit id reserved");
        Ok(Reservation {
            allocator: self,
            id,
            date,
            issued,
        })
    }

    /// Last sequence number issued on `date`, or 0.
    pub fn last_issued(&self, date: DepositDate) -> u64 {
        match self.store.read(date) {
            Ok(value) => value.unwrap_or(0),
            Err(err) => {
                log_counter_fault(date, &err);
                0
            }
        }
    }

    fn release(&self, date: DepositDate, issued: u64) -> LedgerResult<()> {
        // Blind decrement: a concurrent allocation in between is not detected.
        self.store.write(date, issued.saturating_sub(1))?;
        Ok(())
    }
}

fn log_counter_fault(date: DepositDate, err: &StoreError) {
    warn!(%date, error = %err, "sequence counter unreadable, restarting day at 0");
}

impl std::fmt::Debug for SequenceAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceAllocator").finish_non_exhaustive()
    }
}

/// An allocated id that has not yet been recorded on the chain.
///
/// Either [`commit`](Reservation::commit) it once its block is appended, or
/// [`rollback`](Reservation::rollback) it to give the sequence number back.
/// Dropping a reservation keeps the id consumed.
#[must_use = "a reservation should be committed or rolled back"]
#[derive(Debug)]
pub struct Reservation<'a> {
    allocator: &'a SequenceAllocator,
    id: DepositId,
    date: DepositDate,
    issued: u64,
}

impl Reservation<'_> {
    pub fn id(&self) -> &DepositId {
        &self.id
    }

    pub fn date(&self) -> DepositDate {
        self.date
    }

    /// The sequence number inside the id.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Keep the id.
    pub fn commit(self) -> DepositId {
        self.id
    }

    /// Give the id back by persisting `issued - 1` as the day's counter.
    pub fn rollback(self) -> LedgerResult<()> {
        self.allocator.release(self.date, self.issued)?;
        debug!(id = %self.id, "deposit id rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fdl_store::{FileCounterStore, InMemoryCounterStore};

    use super::*;
    use crate::error::LedgerError;
    use crate::testutil;

    fn allocator() -> (Arc<InMemoryCounterStore>, SequenceAllocator) {
        let store = Arc::new(InMemoryCounterStore::new());
        let allocator = SequenceAllocator::new(Box::new(store.clone()));
        (store, allocator)
    }

    #[test]
    fn first_id_of_the_day_ends_in_001() {
        let (_, alloc) = allocator();
        let id = alloc.allocate(testutil::day()).unwrap().commit();
        assert_eq!(id.as_str(), "20251127001");
    }

    #[test]
    fn k_allocations_issue_1_through_k() {
        let (_, alloc) = allocator();
        let ids: Vec<_> = (0..12)
            .map(|_| alloc.allocate(testutil::day()).unwrap().commit())
            .collect();
        let suffixes: Vec<u64> = ids.iter().map(|id| id.parts().unwrap().1).collect();
        assert_eq!(suffixes, (1..=12).collect::<Vec<_>>());
        assert_eq!(alloc.last_issued(testutil::day()), 12);
    }

    #[test]
    fn days_are_independent() {
        let (_, alloc) = allocator();
        let next_day = DepositDate::from_ymd(2025, 11, 28).unwrap();
        alloc.allocate(testutil::day()).unwrap().commit();
        alloc.allocate(testutil::day()).unwrap().commit();
        let id = alloc.allocate(next_day).unwrap().commit();
        assert_eq!(id.as_str(), "20251128001");
    }

    #[test]
    fn rollback_reissues_the_same_id() {
        let (_, alloc) = allocator();
        alloc.allocate(testutil::day()).unwrap().commit();

        let reserved = alloc.allocate(testutil::day()).unwrap();
        let id = reserved.id().clone();
        reserved.rollback().unwrap();

        let again = alloc.allocate(testutil::day()).unwrap().commit();
        assert_eq!(again, id);
        assert_eq!(again.as_str(), "20251127002");
    }

    #[test]
    fn garbage_counter_restarts_the_day() {
        let (store, alloc) = allocator();
        store.set_raw(testutil::day(), "not-a-number");
        let id = alloc.allocate(testutil::day()).unwrap().commit();
        assert_eq!(id.as_str(), "20251127001");
    }

    #[test]
    fn failed_counter_write_issues_nothing() {
        let (store, alloc) = allocator();
        store.set_read_only(true);
        let err = alloc.allocate(testutil::day()).unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(StoreError::ReadOnly)));
        assert_eq!(alloc.last_issued(testutil::day()), 0);
    }

    #[test]
    fn suffix_widens_past_999() {
        let (store, alloc) = allocator();
        store.set_raw(testutil::day(), "999");
        let id = alloc.allocate(testutil::day()).unwrap().commit();
        assert_eq!(id.as_str(), "202511271000");
    }

    #[test]
    fn counters_survive_a_new_allocator() {
        let dir = tempfile::tempdir().unwrap();
        let first = SequenceAllocator::new(Box::new(FileCounterStore::new(dir.path())));
        first.allocate(testutil::day()).unwrap().commit();
        first.allocate(testutil::day()).unwrap().commit();
        drop(first);

        let second = SequenceAllocator::new(Box::new(FileCounterStore::new(dir.path())));
        let id = second.allocate(testutil::day()).unwrap().commit();
        assert_eq!(id.as_str(), "20251127003");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("seq_20251127")).unwrap(),
            "3"
        );
    }
}
