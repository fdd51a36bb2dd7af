//! File checks that only trust the chain after it has verified.

use fdl_types::DepositId;
use serde::Serialize;
use tracing::debug;

use crate::ledger::Ledger;
use crate::record::DepositEntry;
use crate::validation::ViolationKind;

/// Outcome of checking a file fingerprint against the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FileCheck {
    /// The chain itself failed verification; no lookup was attempted.
    ChainTampered { index: u64, kind: ViolationKind },
    UnknownDeposit,
    /// No deposit carries the requested file hash.
    UnknownFile,
    /// The candidate matches the recorded fingerprint.
    Intact { entry: DepositEntry },
    /// The candidate differs from the recorded fingerprint.
    FileTampered {
        entry: DepositEntry,
        expected: String,
        actual: String,
    },
}

impl FileCheck {
    pub fn is_intact(&self) -> bool {
        matches!(self, Self::Intact { .. })
    }
}

/// What a deposit certificate is rendered from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReportEntry {
    ChainTampered { index: u64, kind: ViolationKind },
    UnknownDeposit,
    Found { entry: DepositEntry },
}

/// Chain-gated lookups over a [`Ledger`].
///
/// Every call verifies the whole chain before answering, so a record is only
/// ever vouched for while the chain is intact.
#[derive(Clone, Copy, Debug)]
pub struct FileAuditor<'a> {
    ledger: &'a Ledger,
}

impl<'a> FileAuditor<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    fn chain_violation(&self) -> Option<(u64, ViolationKind)> {
        let result = self.ledger.verify();
        result.first_bad_index.zip(result.reason)
    }

    /// Compare `candidate` with the fingerprint recorded under `id`.
    ///
    /// Hex digests are compared ignoring case and surrounding whitespace.
    pub fn check_file(&self, id: &DepositId, candidate: &str) -> FileCheck {
        if let Some((index, kind)) = self.chain_violation() {
            return FileCheck::ChainTampered { index, kind };
        }
        let Some(entry) = self.ledger.query().by_deposit_id(id) else {
            return FileCheck::UnknownDeposit;
        };
        let check = if entry.record.file_hash.matches(candidate) {
            FileCheck::Intact { entry }
        } else {
            let expected = entry.record.file_hash.as_str().to_string();
            FileCheck::FileTampered {
                entry,
                expected,
                actual: candidate.trim().to_string(),
            }
        };
        debug!(deposit_id = %id, intact = check.is_intact(), "file checked");
        check
    }

    /// Whether any deposit carries `file_hash`.
    pub fn check_file_hash(&self, file_hash: &str) -> FileCheck {
        if let Some((index, kind)) = self.chain_violation() {
            return FileCheck::ChainTampered { index, kind };
        }
        match self.ledger.query().by_file_hash(file_hash) {
            Some(entry) => FileCheck::Intact { entry },
            None => FileCheck::UnknownFile,
        }
    }

    pub fn report_entry(&self, id: &DepositId) -> ReportEntry {
        if let Some((index, kind)) = self.chain_violation() {
            return ReportEntry::ChainTampered { index, kind };
        }
        match self.ledger.query().by_deposit_id(id) {
            Some(entry) => ReportEntry::Found { entry },
            None => ReportEntry::UnknownDeposit,
        }
    }
}
