use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use fdl_crypto::BlockHasher;
use fdl_ledger::{
    DepositEntry, DepositOrchestrator, DepositReceipt, DepositRequest, FileAuditor, FileCheck,
    Ledger, LoadOutcome, OwnedLookup, ReportEntry, SequenceAllocator, VerifyResult,
};
use fdl_store::{
    CounterStore, FileCounterStore, FileSnapshotStore, InMemoryCounterStore,
    InMemorySnapshotStore, SnapshotStore,
};
use fdl_types::{BlockHash, DepositId, OwnerId, Timestamp};
use serde::Serialize;
use tracing::info;

use crate::config::VaultConfig;
use crate::error::{SdkError, SdkResult};

/// Summary of the chain's current shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultStatus {
    pub blocks: usize,
    pub deposits: usize,
    pub latest_index: u64,
    pub latest_hash: BlockHash,
    pub load_outcome: String,
}

/// Handle over one deposit ledger and its sequence counters.
///
/// Deposits take the write lock for the whole allocate-then-append step;
/// lookups and verification share the read lock. Only one vault may own a
/// data directory at a time; nothing guards against a second process.
pub struct DepositVault {
    config: Option<VaultConfig>,
    ledger: RwLock<Ledger>,
    orchestrator: DepositOrchestrator,
}

impl DepositVault {
    /// Open (or create) the vault described by `config`.
    pub fn open(config: VaultConfig) -> SdkResult<Self> {
        let chain = FileSnapshotStore::new(config.chain_path());
        let counters = FileCounterStore::new(config.sequence_path());
        let mut vault = Self::from_stores(Box::new(chain), Box::new(counters))?;
        info!(data_dir = %config.data_dir.display(), "deposit vault opened");
        vault.config = Some(config);
        Ok(vault)
    }

    /// A vault that lives only as long as the value.
    pub fn in_memory() -> SdkResult<Self> {
        Self::from_stores(
            Box::new(InMemorySnapshotStore::new()),
            Box::new(InMemoryCounterStore::new()),
        )
    }

    pub fn from_stores(
        snapshots: Box<dyn SnapshotStore>,
        counters: Box<dyn CounterStore>,
    ) -> SdkResult<Self> {
        let ledger = Ledger::init(snapshots)?;
        let orchestrator = DepositOrchestrator::new(SequenceAllocator::new(counters));
        Ok(Self {
            config: None,
            ledger: RwLock::new(ledger),
            orchestrator,
        })
    }

    /// `None` for vaults not opened from a config.
    pub fn config(&self) -> Option<&VaultConfig> {
        self.config.as_ref()
    }

    fn read(&self) -> SdkResult<RwLockReadGuard<'_, Ledger>> {
        self.ledger.read().map_err(|_| SdkError::LockPoisoned)
    }

    fn write(&self) -> SdkResult<RwLockWriteGuard<'_, Ledger>> {
        self.ledger.write().map_err(|_| SdkError::LockPoisoned)
    }

    pub fn load_outcome(&self) -> SdkResult<LoadOutcome> {
        Ok(self.read()?.load_outcome().clone())
    }

    pub fn status(&self) -> SdkResult<VaultStatus> {
        let ledger = self.read()?;
        let latest = ledger.latest();
        Ok(VaultStatus {
            blocks: ledger.len(),
            deposits: ledger.deposit_count(),
            latest_index: latest.index,
            latest_hash: latest.hash.clone(),
            load_outcome: format!("{:?}", ledger.load_outcome()),
        })
    }

    // ---- Deposits ----

    pub fn deposit(&self, request: DepositRequest) -> SdkResult<DepositReceipt> {
        self.deposit_at(request, Timestamp::now())
    }

    pub fn deposit_at(&self, request: DepositRequest, now: Timestamp) -> SdkResult<DepositReceipt> {
        let mut ledger = self.write()?;
        Ok(self.orchestrator.deposit_at(&mut ledger, request, now)?)
    }

    /// Fingerprint the file at `path` and deposit it under its file name.
    pub fn deposit_file(
        &self,
        path: impl AsRef<Path>,
        owner_id: OwnerId,
        file_type: impl Into<String>,
    ) -> SdkResult<DepositReceipt> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SdkError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.deposit(DepositRequest {
            file_hash: BlockHasher::file_hash(&bytes),
            file_name,
            file_size: bytes.len() as u64,
            file_type: file_type.into(),
            owner_id,
        })
    }

    // ---- Verification and lookups ----

    pub fn verify(&self) -> SdkResult<VerifyResult> {
        Ok(self.read()?.verify())
    }

    pub fn deposit_by_id(&self, id: &DepositId) -> SdkResult<Option<DepositEntry>> {
        Ok(self.read()?.query().by_deposit_id(id))
    }

    pub fn deposit_by_file_hash(&self, file_hash: &str) -> SdkResult<Option<DepositEntry>> {
        Ok(self.read()?.query().by_file_hash(file_hash))
    }

    pub fn search(&self, owner: &OwnerId, name_fragment: &str) -> SdkResult<Vec<DepositEntry>> {
        Ok(self.read()?.query().by_owner_and_name(owner, name_fragment))
    }

    pub fn deposits_of(&self, owner: &OwnerId) -> SdkResult<Vec<DepositEntry>> {
        Ok(self.read()?.query().by_owner(owner))
    }

    pub fn owned_deposit(&self, id: &DepositId, owner: &OwnerId) -> SdkResult<OwnedLookup> {
        Ok(self.read()?.query().owned_by_deposit_id(id, owner))
    }

    pub fn check_file(&self, id: &DepositId, candidate_hash: &str) -> SdkResult<FileCheck> {
        Ok(FileAuditor::new(&*self.read()?).check_file(id, candidate_hash))
    }

    pub fn check_file_hash(&self, file_hash: &str) -> SdkResult<FileCheck> {
        Ok(FileAuditor::new(&*self.read()?).check_file_hash(file_hash))
    }

    pub fn report_entry(&self, id: &DepositId) -> SdkResult<ReportEntry> {
        Ok(FileAuditor::new(&*self.read()?).report_entry(id))
    }

    /// Release the vault. Appends are already on disk; nothing is written.
    pub fn shutdown(self) -> SdkResult<()> {
        let ledger = self.ledger.into_inner().map_err(|_| SdkError::LockPoisoned)?;
        ledger.shutdown()?;
        Ok(())
    }
}

impl std::fmt::Debug for DepositVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepositVault")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use fdl_ledger::ViolationKind;

    use super::*;

    fn owner(id: &str) -> OwnerId {
        OwnerId::new(id).unwrap()
    }

    fn request(owner_id: &str, name: &str, content: &str) -> DepositRequest {
        DepositRequest {
            file_hash: BlockHasher::file_hash(content.as_bytes()),
            file_name: name.into(),
            file_size: content.len() as u64,
            file_type: "application/pdf".into(),
            owner_id: owner(owner_id),
        }
    }

    fn noon() -> Timestamp {
        // 2025-11-27T12:00:00.000Z
        Timestamp::from_millis(1_764_244_800_000).unwrap()
    }

    #[test]
    fn open_creates_layout_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::with_data_dir(dir.path());
        let vault = DepositVault::open(config.clone()).unwrap();
        assert_eq!(vault.load_outcome().unwrap(), LoadOutcome::Created);

        vault.deposit_at(request("U1", "a.pdf", "alpha"), noon()).unwrap();
        assert!(config.chain_path().exists());
        assert_eq!(
            std::fs::read_to_string(config.sequence_path().join("seq_20251127")).unwrap(),
            "1"
        );
    }

    #[test]
    fn reopen_continues_chain_and_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::with_data_dir(dir.path());

        let vault = DepositVault::open(config.clone()).unwrap();
        let first = vault.deposit_at(request("U1", "a.pdf", "alpha"), noon()).unwrap();
        vault.shutdown().unwrap();

        let vault = DepositVault::open(config).unwrap();
        assert_eq!(vault.load_outcome().unwrap(), LoadOutcome::Loaded { blocks: 2 });
        let second = vault.deposit_at(request("U1", "b.pdf", "beta"), noon()).unwrap();

        assert_eq!(second.deposit_id.as_str(), "20251127002");
        assert_eq!(second.prev_block_hash, first.block_hash);
        assert!(vault.verify().unwrap().ok);
    }

    #[test]
    fn lookups_through_the_vault() {
        let vault = DepositVault::in_memory().unwrap();
        let receipt = vault.deposit_at(request("U1", "Thesis.pdf", "thesis"), noon()).unwrap();
        vault.deposit_at(request("U2", "thesis.pdf", "other"), noon()).unwrap();

        let entry = vault.deposit_by_id(&receipt.deposit_id).unwrap().unwrap();
        assert_eq!(entry.block.hash, receipt.block_hash);

        let hash = BlockHasher::file_hash(b"thesis");
        let by_hash = vault.deposit_by_file_hash(hash.as_str()).unwrap().unwrap();
        assert_eq!(by_hash.record.id, receipt.deposit_id);

        assert_eq!(vault.search(&owner("U1"), "THESIS").unwrap().len(), 1);
        assert_eq!(vault.deposits_of(&owner("U2")).unwrap().len(), 1);
        assert_eq!(
            vault.owned_deposit(&receipt.deposit_id, &owner("U2")).unwrap(),
            OwnedLookup::OtherOwner
        );
        assert!(vault.check_file(&receipt.deposit_id, hash.as_str()).unwrap().is_intact());

        let status = vault.status().unwrap();
        assert_eq!(status.blocks, 3);
        assert_eq!(status.deposits, 2);
    }

    #[test]
    fn deposit_file_hashes_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("essay.txt");
        std::fs::write(&path, b"essay body").unwrap();

        let vault = DepositVault::in_memory().unwrap();
        let receipt = vault.deposit_file(&path, owner("U1"), "text/plain").unwrap();
        let entry = vault.deposit_by_id(&receipt.deposit_id).unwrap().unwrap();
        assert_eq!(entry.record.file_name, "essay.txt");
        assert_eq!(entry.record.file_size, 10);
        assert_eq!(entry.record.file_hash, BlockHasher::file_hash(b"essay body"));

        let missing = vault.deposit_file(dir.path().join("nope"), owner("U1"), "text/plain");
        assert!(matches!(missing, Err(SdkError::ReadFile { .. })));
    }

    #[test]
    fn tampered_file_on_disk_is_detected_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::with_data_dir(dir.path());
        let vault = DepositVault::open(config.clone()).unwrap();
        for (name, content) in [("a.pdf", "1"), ("report.docx", "2"), ("a_final.pdf", "3")] {
            vault.deposit_at(request("U1", name, content), noon()).unwrap();
        }
        drop(vault);

        let text = std::fs::read_to_string(config.chain_path()).unwrap();
        std::fs::write(config.chain_path(), text.replace("report.docx", "x")).unwrap();

        let vault = DepositVault::open(config).unwrap();
        let result = vault.verify().unwrap();
        assert_eq!(result.first_bad_index, Some(2));
        assert_eq!(result.reason, Some(ViolationKind::HashMismatch));

        let id = DepositId::compose(noon().date(), 1);
        assert!(matches!(
            vault.report_entry(&id).unwrap(),
            ReportEntry::ChainTampered { index: 2, .. }
        ));
    }

    #[test]
    fn corrupt_chain_file_is_recovered() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::with_data_dir(dir.path());
        std::fs::write(config.chain_path(), "][").unwrap();

        let vault = DepositVault::open(config).unwrap();
        assert!(vault.load_outcome().unwrap().is_recovered());
        assert_eq!(vault.status().unwrap().blocks, 1);
    }

    #[test]
    fn concurrent_deposits_get_distinct_ids() {
        let vault = Arc::new(DepositVault::in_memory().unwrap());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let vault = Arc::clone(&vault);
                thread::spawn(move || {
                    vault
                        .deposit_at(request("U1", &format!("f{i}.pdf"), &format!("c{i}")), noon())
                        .unwrap()
                        .deposit_id
                })
            })
            .collect();

        let mut ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert!(vault.verify().unwrap().ok);
    }
}
