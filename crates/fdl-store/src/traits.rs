use fdl_types::DepositDate;

use crate::error::StoreResult;

/// Holder of the single, whole-chain snapshot.
///
/// Implementations must satisfy:
/// - `write` replaces the previous snapshot entirely; a reader never observes
///   a half-written snapshot.
/// - `read` returns exactly the bytes last written.
/// - Write failures are returned, never swallowed.
pub trait SnapshotStore: Send + Sync {
    /// Read the current snapshot. Returns `Ok(None)` if none was ever written.
    fn read(&self) -> StoreResult<Option<Vec<u8>>>;

    /// Replace the snapshot with `bytes`.
    fn write(&self, bytes: &[u8]) -> StoreResult<()>;

    /// Human-readable location, for log lines.
    fn location(&self) -> String;
}

/// Per-day persisted sequence counters.
///
/// The stored value is the last sequence number issued on that day. Every
/// call goes to the backend; implementations must not cache.
pub trait CounterStore: Send + Sync {
    /// Last issued value for `date`. `Ok(None)` if the day has no counter yet;
    /// `Err` if the counter exists but cannot be read or parsed.
    fn read(&self, date: DepositDate) -> StoreResult<Option<u64>>;

    /// Persist `value` as the last issued sequence for `date`.
    fn write(&self, date: DepositDate, value: u64) -> StoreResult<()>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<T> {
    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        (**self).read()
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        (**self).write(bytes)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

impl<T: CounterStore + ?Sized> CounterStore for std::sync::Arc<T> {
    fn read(&self, date: DepositDate) -> StoreResult<Option<u64>> {
        (**self).read(date)
    }

    fn write(&self, date: DepositDate, value: u64) -> StoreResult<()> {
        (**self).write(date, value)
    }
}
