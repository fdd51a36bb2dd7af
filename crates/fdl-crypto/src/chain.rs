use fdl_types::BlockHash;

/// Trait for nodes that participate in a hash chain.
pub trait HasBlockHash {
    /// The node's stored hash.
    fn block_hash(&self) -> &BlockHash;
    /// The stored hash of the predecessor (the genesis parent marker for block 0).
    fn prev_hash(&self) -> &BlockHash;
    /// Hash recomputed from the node's current fields.
    fn recompute_hash(&self) -> BlockHash;
}

/// Hash chain integrity verifier.
///
/// For every position `i >= 1`, in order:
/// 1. the node's hash is recomputed from its stored fields and compared with
///    the stored hash;
/// 2. the node's `prev_hash` is compared with the stored hash at `i - 1`.
///
/// The first failure stops the walk. Position 0 is trusted as-is: nothing
/// external anchors the genesis hash.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain, returning the number of positions inspected.
    pub fn verify_chain(nodes: &[impl HasBlockHash]) -> Result<usize, ChainError> {
        for i in 1..nodes.len() {
            if nodes[i].recompute_hash() != *nodes[i].block_hash() {
                return Err(ChainError::HashMismatch { index: i });
            }
            if nodes[i].prev_hash() != nodes[i - 1].block_hash() {
                return Err(ChainError::BrokenLink { index: i });
            }
        }
        Ok(nodes.len())
    }
}

/// Errors from chain verification.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("hash mismatch at index {index}: computed hash differs from stored")]
    HashMismatch { index: usize },

    #[error("broken link at index {index}: prev_hash does not match predecessor")]
    BrokenLink { index: usize },
}

impl ChainError {
    pub fn index(&self) -> usize {
        match self {
            Self::HashMismatch { index } | Self::BrokenLink { index } => *index,
        }
    }
}
