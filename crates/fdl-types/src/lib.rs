//! Foundation types for the file deposit ledger (FDL).
//!
//! Every other FDL crate depends on `fdl-types`. The types here are thin,
//! serde-transparent wrappers so that the persisted chain snapshot stays
//! plain JSON while the Rust side keeps distinct types for distinct roles.
//!
//! # Key Types
//!
//! - [`BlockHash`] -- hex SHA-256 of a block, or the genesis parent marker `"0"`
//! - [`FileHash`] -- opaque content fingerprint computed by the upload flow
//! - [`DepositId`] -- human-readable `YYYYMMDDnnn` deposit identifier
//! - [`DepositDate`] -- the calendar day a sequence counter belongs to
//! - [`OwnerId`] -- the depositing user
//! - [`Timestamp`] -- UTC instant at millisecond precision

pub mod deposit;
pub mod error;
pub mod hash;
pub mod temporal;

pub use deposit::{DepositDate, DepositId, OwnerId};
pub use error::TypeError;
pub use hash::{BlockHash, FileHash};
pub use temporal::Timestamp;
