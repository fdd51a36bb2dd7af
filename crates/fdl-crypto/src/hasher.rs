use fdl_types::{BlockHash, FileHash};
use sha2::{Digest, Sha256};

/// SHA-256 hasher for ledger blocks.
///
/// A block hash covers the concatenation, without separators, of:
///
/// ```text
/// decimal(index) ∥ prevHash ∥ timestamp(RFC 3339, ms, Z) ∥ json(payload)
/// ```
///
/// No domain tag is prepended, so hashes stay reproducible by any tool that
/// knows the field layout.
pub struct BlockHasher;

impl BlockHasher {
    /// Hash the already-rendered block fields.
    pub fn hash_fields(
        index: u64,
        prev_hash: &BlockHash,
        timestamp: &str,
        payload_json: &str,
    ) -> BlockHash {
        let mut hasher = Sha256::new();
        hasher.update(index.to_string().as_bytes());
        hasher.update(prev_hash.as_str().as_bytes());
        hasher.update(timestamp.as_bytes());
        hasher.update(payload_json.as_bytes());
        BlockHash::from_digest(hasher.finalize().into())
    }

    /// Fingerprint raw file content the way the upload flow does.
    pub fn file_hash(data: &[u8]) -> FileHash {
        FileHash::new(Self::sha256_hex(data))
    }

    /// Plain lowercase hex SHA-256.
    pub fn sha256_hex(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            BlockHasher::sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn fields_are_concatenated_without_separators() {
        let prev = BlockHash::genesis_parent();
        let hash = BlockHasher::hash_fields(0, &prev, "T", "{}");
        assert_eq!(hash.as_str(), BlockHasher::sha256_hex(b"00T{}"));
    }

    #[test]
    fn hash_is_deterministic() {
        let prev = BlockHash::genesis_parent();
        let a = BlockHasher::hash_fields(1, &prev, "2025-01-01T00:00:00.000Z", "{\"a\":1}");
        let b = BlockHasher::hash_fields(1, &prev, "2025-01-01T00:00:00.000Z", "{\"a\":1}");
        assert_eq!(a, b);
    }

    #[test]
    fn every_field_changes_the_hash() {
        let prev = BlockHash::genesis_parent();
        let other_prev = BlockHash::from_digest([1; 32]);
        let base = BlockHasher::hash_fields(1, &prev, "t", "p");
        assert_ne!(base, BlockHasher::hash_fields(2, &prev, "t", "p"));
        assert_ne!(base, BlockHasher::hash_fields(1, &other_prev, "t", "p"));
        assert_ne!(base, BlockHasher::hash_fields(1, &prev, "u", "p"));
        assert_ne!(base, BlockHasher::hash_fields(1, &prev, "t", "q"));
    }

    #[test]
    fn file_hash_is_sha256_of_content() {
        let fingerprint = BlockHasher::file_hash(b"abc");
        assert!(fingerprint.matches(
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        ));
    }
}
