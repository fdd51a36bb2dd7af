//! Persistence backends for the file deposit ledger.
//!
//! Two independent pieces of state are persisted:
//!
//! - the **chain snapshot**: the whole block list, rewritten on every append
//!   ([`SnapshotStore`]);
//! - the **sequence counters**: one `lastIssued` value per calendar day
//!   ([`CounterStore`]).
//!
//! The store never interprets snapshot contents; encoding and corruption
//! handling belong to the ledger.
//!
//! # Storage Backends
//!
//! - [`FileSnapshotStore`] / [`FileCounterStore`] -- on-disk, atomic replace
//! - [`InMemorySnapshotStore`] / [`InMemoryCounterStore`] -- for tests and embedding
//!
//! # Design Rules
//!
//! 1. A snapshot write replaces the previous snapshot atomically
//!    (temp file in the same directory, then rename).
//! 2. All write errors are propagated, never silently ignored.
//! 3. No file locking: callers enforce a single writer.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::{FileCounterStore, FileSnapshotStore};
pub use memory::{InMemoryCounterStore, InMemorySnapshotStore};
pub use traits::{CounterStore, SnapshotStore};
