//! Cryptographic primitives for the file deposit ledger.
//!
//! Provides SHA-256 block hashing over the canonical field concatenation and
//! a generic hash-chain verifier. All crypto operations wrap established
//! libraries; there is no custom cryptography.

pub mod chain;
pub mod hasher;

pub use chain::{ChainError, HasBlockHash, HashChainVerifier};
pub use hasher::BlockHasher;
