//! High-level SDK for the file deposit ledger.
//!
//! [`DepositVault`] is the entry point for applications: it opens the chain
//! snapshot and sequence counters described by a [`VaultConfig`] and exposes
//! deposits, verification and lookups behind a single lock.

pub mod config;
pub mod error;
pub mod vault;

pub use config::VaultConfig;
pub use error::{SdkError, SdkResult};
pub use vault::{DepositVault, VaultStatus};

// Re-export key types
pub use fdl_ledger::{
    BlockInfo, DepositEntry, DepositReceipt, DepositRecord, DepositRequest, FileCheck,
    LoadOutcome, OwnedLookup, ReportEntry, VerifyResult, ViolationKind,
};
pub use fdl_types::{BlockHash, DepositId, FileHash, OwnerId, Timestamp};
