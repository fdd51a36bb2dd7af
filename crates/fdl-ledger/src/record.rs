use fdl_types::{BlockHash, DepositId, FileHash, OwnerId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::block::BlockInfo;

/// Metadata about one deposited file; the payload of every non-genesis block.
///
/// Field order is part of the block hash (it fixes the JSON rendering) and
/// must not change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    pub id: DepositId,
    pub file_hash: FileHash,
    pub owner_id: OwnerId,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub deposit_time: Timestamp,
}

impl DepositRecord {
    /// Combine an upload request with an allocated id.
    pub fn from_request(id: DepositId, request: DepositRequest, deposit_time: Timestamp) -> Self {
        Self {
            id,
            file_hash: request.file_hash,
            owner_id: request.owner_id,
            file_name: request.file_name,
            file_size: request.file_size,
            file_type: request.file_type,
            deposit_time,
        }
    }
}

/// What the upload flow hands over once it has stored a file and
/// fingerprinted it. The ledger never sees file bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub file_hash: FileHash,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub owner_id: OwnerId,
}

/// Returned to the upload flow after a successful deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReceipt {
    pub deposit_id: DepositId,
    pub block_index: u64,
    pub block_hash: BlockHash,
    pub prev_block_hash: BlockHash,
}

/// A deposit record together with the block that carries it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositEntry {
    pub record: DepositRecord,
    pub block: BlockInfo,
}
