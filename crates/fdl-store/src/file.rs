use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fdl_types::DepositDate;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{CounterStore, SnapshotStore};

/// Chain snapshot kept in a single file.
///
/// Writes go to a temporary file created next to the target and are then
/// renamed over it, so the snapshot on disk is always either the old or the
/// new version.
#[derive(Clone, Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        replace_atomically(&self.path, bytes)?;
        debug!(path = %self.path.display(), len = bytes.len(), "snapshot written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Sequence counters stored as one small text file per day
/// (`<dir>/seq_YYYYMMDD`, holding the decimal last-issued value).
#[derive(Clone, Debug)]
pub struct FileCounterStore {
    dir: PathBuf,
}

impl FileCounterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the counter file for `date`.
    pub fn counter_path(&self, date: DepositDate) -> PathBuf {
        self.dir.join(format!("seq_{date}"))
    }
}

impl CounterStore for FileCounterStore {
    fn read(&self, date: DepositDate) -> StoreResult<Option<u64>> {
        let raw = match fs::read_to_string(self.counter_path(date)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        raw.trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| StoreError::InvalidCounter {
                date: date.to_string(),
                raw,
            })
    }

    fn write(&self, date: DepositDate, value: u64) -> StoreResult<()> {
        replace_atomically(&self.counter_path(date), value.to_string().as_bytes())?;
        debug!(%date, value, "sequence counter written");
        Ok(())
    }
}

/// Write `bytes` to a sibling temp file, fsync it, and rename it over `path`.
fn replace_atomically(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Replace {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
