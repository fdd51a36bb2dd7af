use fdl_types::Timestamp;
use tracing::{error, info, warn};

use crate::error::DepositError;
use crate::ledger::Ledger;
use crate::record::{DepositReceipt, DepositRecord, DepositRequest};
use crate::sequence::SequenceAllocator;

/// Turns an upload into a committed ledger entry.
///
/// The flow is allocate id, build record, append block. If the append
/// fails the id is rolled back so the next deposit reuses it. Deposits are
/// serialized by the `&mut Ledger` borrow.
#[derive(Debug)]
pub struct DepositOrchestrator {
    allocator: SequenceAllocator,
}

impl DepositOrchestrator {
    pub fn new(allocator: SequenceAllocator) -> Self {
        Self { allocator }
    }

    pub fn allocator(&self) -> &SequenceAllocator {
        &self.allocator
    }

    /// Deposit `request` at the current time.
    pub fn deposit(
        &self,
        ledger: &mut Ledger,
        request: DepositRequest,
    ) -> Result<DepositReceipt, DepositError> {
        self.deposit_at(ledger, request, Timestamp::now())
    }

    /// Deposit `request` at `now`.
    ///
    /// `now` fixes the id's date (UTC), the record's deposit time and the
    /// block timestamp.
    pub fn deposit_at(
        &self,
        ledger: &mut Ledger,
        request: DepositRequest,
        now: Timestamp,
    ) -> Result<DepositReceipt, DepositError> {
        let reservation = self
            .allocator
            .allocate(now.date())
            .map_err(DepositError::Allocation)?;
        let id = reservation.id().clone();
        let record = DepositRecord::from_request(id.clone(), request, now);

        match ledger.append_at(record, now) {
            Ok(block) => {
                let id = reservation.commit();
                info!(
                    deposit_id = %id,
                    block_index = block.index,
                    block_hash = block.hash.short(),
                    "deposit recorded"
                );
                Ok(DepositReceipt {
                    deposit_id: id,
                    block_index: block.index,
                    block_hash: block.hash,
                    prev_block_hash: block.prev_hash,
                })
            }
            Err(append) => match reservation.rollback() {
                Ok(()) => {
                    warn!(deposit_id = %id, error = %append, "append failed, deposit id rolled back");
                    Err(DepositError::Append { id, source: append })
                }
                Err(rollback) => {
                    error!(
                        deposit_id = %id,
                        append_error = %append,
                        rollback_error = %rollback,
                        "append failed and deposit id could not be rolled back"
                    );
                    Err(DepositError::RollbackFailed {
                        id,
                        rollback,
                        append,
                    })
                }
            },
        }
    }
}
