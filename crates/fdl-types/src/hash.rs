use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of a hex-encoded SHA-256 digest.
pub const HEX_DIGEST_LEN: usize = 64;

/// Hash of a block in the deposit chain.
///
/// Normally the lowercase hex SHA-256 digest of the block's fields. The
/// genesis block's parent is the single character `"0"`, so this type does
/// not insist on a 64-character digest when deserialized. A tampered snapshot
/// may contain anything here and must still load so verification can report
/// it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHash(String);

impl BlockHash {
    /// The `prevHash` value carried by the genesis block.
    pub const GENESIS_PARENT: &'static str = "0";

    /// Parent marker used by block 0.
    pub fn genesis_parent() -> Self {
        Self(Self::GENESIS_PARENT.to_string())
    }

    /// Hex-encode a raw 32-byte digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Parse a 64-character hex digest. Uppercase input is normalized.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns `true` for the genesis parent marker.
    pub fn is_genesis_parent(&self) -> bool {
        self.0 == Self::GENESIS_PARENT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 characters, for log lines and terminal output.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(12);
        &self.0[..end]
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.short())
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BlockHash {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Content fingerprint of a deposited file.
///
/// Computed upstream by the upload flow and opaque to the ledger: it is
/// neither deduplicated nor used as a key. Comparisons against a candidate
/// hash ignore ASCII case.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileHash(String);

impl FileHash {
    /// Wrap a fingerprint exactly as supplied.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Validate a hex SHA-256 fingerprint and normalize it to lowercase.
    pub fn parse_sha256(s: &str) -> Result<Self, TypeError> {
        let trimmed = s.trim();
        if trimmed.len() != HEX_DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: HEX_DIGEST_LEN,
                actual: trimmed.len(),
            });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHex(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Case-insensitive comparison with a candidate fingerprint.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.eq_ignore_ascii_case(candidate.trim())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileHash({})", self.0)
    }
}

impl fmt::Display for FileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
