//! Append-only deposit ledger for the file deposit platform.
//!
//! This crate is the heart of FDL. It provides:
//! - `Block` / `DepositRecord` types with SHA-256 hash-linked integrity
//! - `Ledger`: the chain store with whole-snapshot persistence and an
//!   explicit reset-to-genesis recovery policy
//! - `SequenceAllocator`: daily `YYYYMMDDnnn` deposit ids with rollback
//! - `DepositOrchestrator`: allocate → record → append, with rollback on failure
//! - `IntegrityVerifier`: recompute-and-compare walk over the whole chain
//! - `QueryEngine`: lookups by deposit id, file hash, and owner + file name
//! - `FileAuditor`: chain-gated file checks and report lookups
//!
//! The ledger assumes a single writer. Wrap it in a lock (see `fdl-sdk`) if
//! more than one thread can deposit.

pub mod audit;
pub mod block;
pub mod deposit;
pub mod error;
pub mod ledger;
pub mod query;
pub mod record;
pub mod sequence;
pub mod validation;

pub use audit::{FileAuditor, FileCheck, ReportEntry};
pub use block::{Block, BlockInfo, Payload, GENESIS_MESSAGE};
pub use deposit::DepositOrchestrator;
pub use error::{DepositError, LedgerError, LedgerResult};
pub use ledger::{Ledger, LoadOutcome};
pub use query::{OwnedLookup, QueryEngine};
pub use record::{DepositEntry, DepositReceipt, DepositRecord, DepositRequest};
pub use sequence::{Reservation, SequenceAllocator};
pub use validation::{IntegrityVerifier, VerifyResult, ViolationKind};

#[cfg(test)]
pub(crate) mod testutil {
    use fdl_types::{DepositDate, DepositId, FileHash, OwnerId, Timestamp};

    use crate::record::{DepositRecord, DepositRequest};

    pub fn owner(id: &str) -> OwnerId {
        OwnerId::new(id).unwrap()
    }

    pub fn day() -> DepositDate {
        DepositDate::from_ymd(2025, 11, 27).unwrap()
    }

    pub fn at(ms_into_day: i64) -> Timestamp {
        // 2025-11-27T00:00:00.000Z
        Timestamp::from_millis(1_764_201_600_000 + ms_into_day).unwrap()
    }

    pub fn request(owner_id: &str, name: &str, content: &str) -> DepositRequest {
        DepositRequest {
            file_hash: fdl_crypto::BlockHasher::file_hash(content.as_bytes()),
            file_name: name.into(),
            file_size: content.len() as u64,
            file_type: "application/pdf".into(),
            owner_id: owner(owner_id),
        }
    }

    pub fn record(seq: u64, owner_id: &str, name: &str, hash: &str) -> DepositRecord {
        DepositRecord {
            id: DepositId::compose(day(), seq),
            file_hash: FileHash::new(hash),
            owner_id: owner(owner_id),
            file_name: name.into(),
            file_size: 1024,
            file_type: "application/pdf".into(),
            deposit_time: at(seq as i64 * 1000),
        }
    }
}
