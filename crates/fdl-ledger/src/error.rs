use fdl_store::StoreError;
use fdl_types::DepositId;

use crate::validation::ViolationKind;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The chain snapshot or a sequence counter could not be written.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("integrity violation at block {index}: {kind}")]
    IntegrityViolation { index: u64, kind: ViolationKind },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors surfaced by [`crate::DepositOrchestrator`].
///
/// Every variant past `Allocation` means an id had been reserved; the
/// orchestrator has already attempted to give it back.
#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    /// No id could be reserved; nothing was written to the chain.
    #[error("sequence allocation failed: {0}")]
    Allocation(#[source] LedgerError),

    /// The block could not be appended; the reserved id was rolled back.
    #[error("chain append failed for deposit {id}: {source}")]
    Append {
        id: DepositId,
        #[source]
        source: LedgerError,
    },

    /// The append failed and giving the id back failed as well. The id stays
    /// consumed and leaves a gap in the day's sequence.
    #[error("rollback of deposit id {id} failed ({rollback}) after append failed ({append})")]
    RollbackFailed {
        id: DepositId,
        rollback: LedgerError,
        append: LedgerError,
    },
}
