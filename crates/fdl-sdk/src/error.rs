use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("ledger error: {0}")]
    Ledger(#[from] fdl_ledger::LedgerError),

    #[error("deposit failed: {0}")]
    Deposit(#[from] fdl_ledger::DepositError),

    #[error("store error: {0}")]
    Store(#[from] fdl_store::StoreError),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("cannot read {}: {source}", path.display())]
    ReadFile {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("vault lock poisoned")]
    LockPoisoned,
}

pub type SdkResult<T> = Result<T, SdkError>;
