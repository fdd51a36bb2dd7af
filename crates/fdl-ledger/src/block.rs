use std::borrow::Cow;

use fdl_crypto::{BlockHasher, HasBlockHash};
use fdl_types::{BlockHash, Timestamp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::record::DepositRecord;

/// Sentinel message carried by block 0.
pub const GENESIS_MESSAGE: &str = "File deposit ledger genesis block";

/// What a block wraps.
///
/// Serialized untagged: a deposit block's `data` is the bare record object and
/// the genesis block's is `{"message": ...}`, matching the snapshot layout.
///
/// Loading is lenient. Stored data that does not render back to exactly the
/// same JSON as a record or genesis marker is kept verbatim as
/// [`Payload::Unrecognized`] and still hashed, so the edit shows up as a hash
/// mismatch on its own block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Deposit(DepositRecord),
    Genesis { message: String },
    Unrecognized(Value),
}

#[derive(Deserialize)]
struct GenesisData {
    message: String,
}

impl Payload {
    pub fn genesis() -> Self {
        Self::Genesis {
            message: GENESIS_MESSAGE.to_string(),
        }
    }

    pub fn as_deposit(&self) -> Option<&DepositRecord> {
        match self {
            Self::Deposit(record) => Some(record),
            Self::Genesis { .. } | Self::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Compact JSON rendering that enters the block hash.
    pub fn canonical_json(&self) -> String {
        match self {
            Self::Unrecognized(value) => value.to_string(),
            // Records and genesis markers hold string keys and plain values only.
            _ => serde_json::to_string(self).expect("payload serializes to JSON"),
        }
    }

    /// Classify stored `data`, keeping it verbatim unless it renders back
    /// byte for byte.
    fn from_stored(value: Value) -> Self {
        let stored = value.to_string();
        let parsed = serde_json::from_value::<DepositRecord>(value.clone())
            .map(Self::Deposit)
            .or_else(|_| {
                serde_json::from_value::<GenesisData>(value.clone())
                    .map(|g| Self::Genesis { message: g.message })
            });
        match parsed {
            Ok(payload) if payload.canonical_json() == stored => payload,
            _ => Self::Unrecognized(value),
        }
    }

    fn missing() -> Self {
        Self::Unrecognized(Value::Null)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_stored)
    }
}

/// One immutable, hash-stamped node of the deposit chain.
///
/// `hash` is `SHA256(index ∥ prevHash ∥ timestamp ∥ json(data))`, always
/// recomputable from the other stored fields. Fields are public so loaded or
/// tampered blocks can be inspected as-is; nothing re-stamps a block after
/// construction.
///
/// A loaded timestamp whose text is not in canonical form is remembered
/// verbatim. That text, not the parsed instant, is what gets hashed and
/// written back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub index: u64,
    pub prev_hash: BlockHash,
    pub data: Payload,
    pub timestamp: Timestamp,
    pub hash: BlockHash,
    stored_timestamp: Option<String>,
}

impl Block {
    /// Build a block and stamp its hash.
    pub fn new(index: u64, prev_hash: BlockHash, data: Payload, timestamp: Timestamp) -> Self {
        let mut block = Self {
            index,
            prev_hash,
            data,
            timestamp,
            hash: BlockHash::genesis_parent(),
            stored_timestamp: None,
        };
        block.hash = block.calculate_hash();
        block
    }

    /// Block 0: genesis parent marker, sentinel payload.
    pub fn genesis(timestamp: Timestamp) -> Self {
        Self::new(0, BlockHash::genesis_parent(), Payload::genesis(), timestamp)
    }

    /// Hash recomputed from the block's current fields.
    pub fn calculate_hash(&self) -> BlockHash {
        BlockHasher::hash_fields(
            self.index,
            &self.prev_hash,
            &self.timestamp_text(),
            &self.data.canonical_json(),
        )
    }

    /// Returns `true` if the stored hash matches the recomputation.
    pub fn is_sealed(&self) -> bool {
        self.calculate_hash() == self.hash
    }

    /// The timestamp exactly as it is hashed and persisted.
    pub fn timestamp_text(&self) -> Cow<'_, str> {
        match &self.stored_timestamp {
            Some(raw) => Cow::Borrowed(raw),
            None => Cow::Owned(self.timestamp.to_rfc3339()),
        }
    }

    pub fn record(&self) -> Option<&DepositRecord> {
        self.data.as_deposit()
    }

    pub fn info(&self) -> BlockInfo {
        BlockInfo::from(self)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredBlockRef<'a> {
    index: u64,
    prev_hash: &'a BlockHash,
    data: &'a Payload,
    timestamp: Cow<'a, str>,
    hash: &'a BlockHash,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBlock {
    index: u64,
    prev_hash: BlockHash,
    #[serde(default = "Payload::missing")]
    data: Payload,
    #[serde(default)]
    timestamp: String,
    hash: BlockHash,
}

impl From<StoredBlock> for Block {
    fn from(stored: StoredBlock) -> Self {
        let parsed = stored.timestamp.parse::<Timestamp>().ok();
        let canonical = parsed.is_some_and(|ts| ts.to_rfc3339() == stored.timestamp);
        Self {
            index: stored.index,
            prev_hash: stored.prev_hash,
            data: stored.data,
            timestamp: parsed.unwrap_or_else(Timestamp::epoch),
            hash: stored.hash,
            stored_timestamp: (!canonical).then_some(stored.timestamp),
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredBlockRef {
            index: self.index,
            prev_hash: &self.prev_hash,
            data: &self.data,
            timestamp: self.timestamp_text(),
            hash: &self.hash,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        StoredBlock::deserialize(deserializer).map(Self::from)
    }
}

impl HasBlockHash for Block {
    fn block_hash(&self) -> &BlockHash {
        &self.hash
    }

    fn prev_hash(&self) -> &BlockHash {
        &self.prev_hash
    }

    fn recompute_hash(&self) -> BlockHash {
        self.calculate_hash()
    }
}

/// Block coordinates shown next to a record by reports and UIs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    pub index: u64,
    pub hash: BlockHash,
    pub prev_hash: BlockHash,
    pub timestamp: Timestamp,
}

impl From<&Block> for BlockInfo {
    fn from(block: &Block) -> Self {
        Self {
            index: block.index,
            hash: block.hash.clone(),
            prev_hash: block.prev_hash.clone(),
            timestamp: block.timestamp,
        }
    }
}
