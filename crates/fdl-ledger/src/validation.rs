use std::fmt;

use fdl_crypto::{ChainError, HashChainVerifier};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::block::Block;
use crate::error::{LedgerError, LedgerResult};

/// Why verification stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A block's stored hash differs from the recomputation over its fields.
    HashMismatch,
    /// A block's `prevHash` differs from its predecessor's stored hash.
    LinkMismatch,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashMismatch => f.write_str("block hash mismatch"),
            Self::LinkMismatch => f.write_str("previous-hash link mismatch"),
        }
    }
}

/// Result of a full chain walk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    pub ok: bool,
    /// Position of the first offending block.
    pub first_bad_index: Option<u64>,
    pub reason: Option<ViolationKind>,
    /// Blocks inspected before the walk ended, genesis included.
    pub blocks_checked: u64,
}

impl VerifyResult {
    fn intact(blocks: usize) -> Self {
        Self {
            ok: true,
            first_bad_index: None,
            reason: None,
            blocks_checked: blocks as u64,
        }
    }

    fn violated(index: usize, kind: ViolationKind) -> Self {
        Self {
            ok: false,
            first_bad_index: Some(index as u64),
            reason: Some(kind),
            blocks_checked: index as u64 + 1,
        }
    }

    /// `Err(IntegrityViolation)` if the walk failed.
    pub fn into_result(self) -> LedgerResult<()> {
        match (self.first_bad_index, self.reason) {
            (Some(index), Some(kind)) => Err(LedgerError::IntegrityViolation { index, kind }),
            _ => Ok(()),
        }
    }
}

/// Tamper detection over a block sequence.
///
/// A full linear scan on every call; nothing is cached and nothing is
/// repaired. Block 0 is trusted as-is, so replacing the whole snapshot
/// (genesis included) with a self-consistent forgery is not detectable here.
pub struct IntegrityVerifier;

impl IntegrityVerifier {
    pub fn verify(blocks: &[Block]) -> VerifyResult {
        match HashChainVerifier::verify_chain(blocks) {
            Ok(checked) => VerifyResult::intact(checked),
            Err(err) => {
                let kind = match err {
                    ChainError::HashMismatch { .. } => ViolationKind::HashMismatch,
                    ChainError::BrokenLink { .. } => ViolationKind::LinkMismatch,
                };
                warn!(index = err.index(), %kind, "deposit chain failed verification");
                VerifyResult::violated(err.index(), kind)
            }
        }
    }
}
