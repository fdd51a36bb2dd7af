use fdl_store::SnapshotStore;
use fdl_types::Timestamp;
use tracing::{debug, info, warn};

use crate::block::{Block, Payload};
use crate::error::{LedgerError, LedgerResult};
use crate::query::QueryEngine;
use crate::record::DepositRecord;
use crate::validation::{IntegrityVerifier, VerifyResult};

/// How [`Ledger::init`] obtained its chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A snapshot was found and decoded. Tampered blocks load as-is.
    Loaded { blocks: usize },
    /// No snapshot existed; a fresh genesis chain was written.
    Created,
    /// The snapshot was unreadable, not a JSON list of blocks, or empty, and
    /// was replaced by a fresh genesis chain. Previous contents are lost.
    Recovered { reason: String },
}

impl LoadOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered { .. })
    }
}

/// The deposit chain.
///
/// Owns the ordered block list and its persisted snapshot. Append-only: the
/// only mutation is [`Ledger::append`]. Block 0 is always genesis, so the
/// chain is never empty.
///
/// Every append rewrites the whole snapshot through the [`SnapshotStore`]
/// before the in-memory chain grows, keeping memory and storage in step when
/// the write fails.
pub struct Ledger {
    store: Box<dyn SnapshotStore>,
    chain: Vec<Block>,
    load_outcome: LoadOutcome,
}

impl Ledger {
    /// Load the persisted chain, or start a fresh one.
    ///
    /// An unreadable or malformed snapshot is not fatal: it is logged,
    /// reported through [`Ledger::load_outcome`], and replaced by a genesis-only
    /// chain. Only a failure to persist that fresh chain is returned.
    pub fn init(store: Box<dyn SnapshotStore>) -> LedgerResult<Self> {
        let location = store.location();
        let loaded = match store.read() {
            Ok(Some(bytes)) => decode(&bytes).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(format!("snapshot unreadable: {e}")),
        };

        let mut ledger = Self {
            store,
            chain: Vec::new(),
            load_outcome: LoadOutcome::Created,
        };

        match loaded {
            Ok(Some(chain)) => {
                if let Some(block) = chain.iter().find(|b| !b.data.is_recognized()) {
                    warn!(%location, index = block.index, "snapshot holds unrecognized block data");
                }
                ledger.load_outcome = LoadOutcome::Loaded {
                    blocks: chain.len(),
                };
                ledger.chain = chain;
            }
            Ok(None) => {
                ledger.reset_to_genesis()?;
            }
            Err(reason) => {
                warn!(%location, %reason, "chain snapshot corrupt, resetting to genesis");
                ledger.load_outcome = LoadOutcome::Recovered { reason };
                ledger.reset_to_genesis()?;
            }
        }

        info!(
            %location,
            blocks = ledger.chain.len(),
            outcome = ?ledger.load_outcome,
            "deposit ledger initialized"
        );
        Ok(ledger)
    }

    fn reset_to_genesis(&mut self) -> LedgerResult<()> {
        let fresh = vec![Block::genesis(Timestamp::now())];
        self.save(&fresh)?;
        self.chain = fresh;
        Ok(())
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Append a deposit record stamped with the current time.
    pub fn append(&mut self, record: DepositRecord) -> LedgerResult<Block> {
        self.append_at(record, Timestamp::now())
    }

    /// Append a deposit record with an explicit block timestamp.
    ///
    /// The new block links to the current tail. The snapshot including the
    /// new block is written first; on failure the chain is left unchanged
    /// and the store error is returned.
    pub fn append_at(&mut self, record: DepositRecord, timestamp: Timestamp) -> LedgerResult<Block> {
        let tail = self.latest();
        let block = Block::new(
            tail.index + 1,
            tail.hash.clone(),
            Payload::Deposit(record),
            timestamp,
        );

        let mut next = Vec::with_capacity(self.chain.len() + 1);
        next.extend_from_slice(&self.chain);
        next.push(block.clone());
        self.save(&next)?;
        self.chain = next;

        debug!(index = block.index, hash = block.hash.short(), "block appended");
        Ok(block)
    }

    /// The tail block.
    pub fn latest(&self) -> &Block {
        // Non-empty: init always installs at least the genesis block.
        &self.chain[self.chain.len() - 1]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.chain.get(i))
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always `false`: block 0 is never removed.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of deposit blocks (the chain minus genesis).
    pub fn deposit_count(&self) -> usize {
        self.chain.len().saturating_sub(1)
    }

    /// Walk the chain and recompute every hash.
    pub fn verify(&self) -> VerifyResult {
        IntegrityVerifier::verify(&self.chain)
    }

    /// Read-only lookups over the current chain.
    pub fn query(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.chain)
    }

    /// End the ledger's lifecycle.
    ///
    /// Every append has already been persisted, so nothing is written: the
    /// snapshot stays byte for byte as the last append (or load) left it.
    pub fn shutdown(self) -> LedgerResult<()> {
        info!(location = %self.store.location(), blocks = self.chain.len(), "deposit ledger shut down");
        Ok(())
    }

    fn save(&self, chain: &[Block]) -> LedgerResult<()> {
        let bytes =
            serde_json::to_vec_pretty(chain).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        self.store.write(&bytes)?;
        Ok(())
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("location", &self.store.location())
            .field("blocks", &self.chain.len())
            .field("load_outcome", &self.load_outcome)
            .finish()
    }
}

fn decode(bytes: &[u8]) -> Result<Vec<Block>, String> {
    let chain: Vec<Block> =
        serde_json::from_slice(bytes).map_err(|e| format!("snapshot malformed: {e}"))?;
    if chain.is_empty() {
        return Err("snapshot holds no blocks".to_string());
    }
    Ok(chain)
}
