use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Where a vault keeps its files.
///
/// Relative `chain_file` and `sequence_dir` are resolved against `data_dir`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub data_dir: PathBuf,
    pub chain_file: PathBuf,
    pub sequence_dir: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            chain_file: PathBuf::from("blockchain.json"),
            sequence_dir: PathBuf::from("sequence"),
        }
    }
}

impl VaultConfig {
    /// Defaults rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Read a TOML config file. Missing keys fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn chain_path(&self) -> PathBuf {
        self.data_dir.join(&self.chain_file)
    }

    pub fn sequence_path(&self) -> PathBuf {
        self.data_dir.join(&self.sequence_dir)
    }
}
