use fdl_types::{DepositId, OwnerId};
use serde::Serialize;

use crate::block::Block;
use crate::record::DepositEntry;

/// Outcome of a lookup by id on behalf of a specific owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OwnedLookup {
    Found(DepositEntry),
    NotFound,
    /// The deposit exists but belongs to someone else. Its contents are
    /// withheld.
    OtherOwner,
}

/// Read-only lookups over a borrowed chain.
///
/// Every call is a linear scan; the genesis block is skipped because it
/// carries no record. Results are returned in chain order.
#[derive(Clone, Copy, Debug)]
pub struct QueryEngine<'a> {
    blocks: &'a [Block],
}

impl<'a> QueryEngine<'a> {
    pub fn new(blocks: &'a [Block]) -> Self {
        Self { blocks }
    }

    fn entries(&self) -> impl Iterator<Item = DepositEntry> + 'a {
        let blocks = self.blocks;
        blocks.iter().filter_map(|block| {
            block.record().map(|record| DepositEntry {
                record: record.clone(),
                block: block.info(),
            })
        })
    }

    /// The record whose id equals `id`.
    pub fn by_deposit_id(&self, id: &DepositId) -> Option<DepositEntry> {
        self.entries().find(|e| &e.record.id == id)
    }

    /// The earliest record whose file hash equals `file_hash` exactly.
    ///
    /// The same file may have been deposited more than once; later deposits
    /// are not reported.
    pub fn by_file_hash(&self, file_hash: &str) -> Option<DepositEntry> {
        self.entries().find(|e| e.record.file_hash.as_str() == file_hash)
    }

    /// Records of `owner` whose file name contains `name_fragment`,
    /// ignoring case. An empty fragment matches every record of the owner.
    pub fn by_owner_and_name(&self, owner: &OwnerId, name_fragment: &str) -> Vec<DepositEntry> {
        let needle = name_fragment.to_lowercase();
        self.entries()
            .filter(|e| &e.record.owner_id == owner)
            .filter(|e| e.record.file_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// All records of `owner`, oldest first.
    pub fn by_owner(&self, owner: &OwnerId) -> Vec<DepositEntry> {
        let mut entries: Vec<_> = self.entries().filter(|e| &e.record.owner_id == owner).collect();
        entries.sort_by_key(|e| e.record.deposit_time);
        entries
    }

    /// [`by_deposit_id`](Self::by_deposit_id), restricted to `owner`.
    pub fn owned_by_deposit_id(&self, id: &DepositId, owner: &OwnerId) -> OwnedLookup {
        match self.by_deposit_id(id) {
            Some(entry) if &entry.record.owner_id == owner => OwnedLookup::Found(entry),
            Some(_) => OwnedLookup::OtherOwner,
            None => OwnedLookup::NotFound,
        }
    }

    /// Number of deposit records in the chain.
    pub fn count(&self) -> usize {
        self.blocks.iter().filter(|b| b.record().is_some()).count()
    }
}
