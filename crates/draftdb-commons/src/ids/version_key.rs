//! Composite storage key for row versions.

use super::{RowId, SavepointSeq};
use crate::storage_key::{decode_key, encode_key, encode_prefix};
use crate::StorageKey;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Composite key for row version records: `(row_id, savepoint_seq)`.
///
/// **Storage format**: `storekey` order-preserving encoding of the tuple
/// `(row_id, seq)`. This guarantees that all versions of one row occupy a
/// contiguous key range (prefix-scannable with [`VersionKey::row_prefix`])
/// and sort within that range by save order, regardless of row id length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionKey {
    pub row_id: RowId,
    pub seq: SavepointSeq,
}

impl VersionKey {
    /// Create a new version key.
    pub fn new(row_id: RowId, seq: SavepointSeq) -> Self {
        Self { row_id, seq }
    }

    /// Get the row id component.
    pub fn row_id(&self) -> &RowId {
        &self.row_id
    }

    /// Get the savepoint sequence component.
    pub fn seq(&self) -> SavepointSeq {
        self.seq
    }

    /// Prefix for scanning all versions of a row.
    pub fn row_prefix(row_id: &RowId) -> Vec<u8> {
        encode_prefix(&(row_id.as_str(),))
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.row_id.as_str().cmp(other.row_id.as_str()) {
            Ordering::Equal => self.seq.cmp(&other.seq),
            other => other,
        }
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl StorageKey for VersionKey {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(&(self.row_id.as_str(), self.seq.as_i64()))
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        let (row_id_str, seq_val): (String, i64) = decode_key(bytes)?;
        Ok(Self::new(RowId::new(row_id_str), SavepointSeq::new(seq_val)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_key_round_trip() {
        let key = VersionKey::new(RowId::new("row-1"), SavepointSeq::new(42));
        let bytes = key.storage_key();
        let parsed = VersionKey::from_storage_key(&bytes).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_version_key_ordering() {
        // Same row, different seq: sorts by seq
        let v100 = VersionKey::new(RowId::new("row-a"), SavepointSeq::new(100));
        let v200 = VersionKey::new(RowId::new("row-a"), SavepointSeq::new(200));
        assert!(
            v100.storage_key() < v200.storage_key(),
            "row-a:100 should sort before row-a:200"
        );

        // Different rows: sorts by row id first
        let other = VersionKey::new(RowId::new("row-b"), SavepointSeq::new(1));
        assert!(
            v200.storage_key() < other.storage_key(),
            "row-a:200 should sort before row-b:1"
        );
    }

    #[test]
    fn test_variable_length_row_id_ordering() {
        // "ab" (2 chars) vs "aaa" (3 chars): lexicographic order must win
        // over length, which a naive length-prefixed encoding would break.
        let long = VersionKey::new(RowId::new("aaa"), SavepointSeq::new(1));
        let short = VersionKey::new(RowId::new("ab"), SavepointSeq::new(1));
        assert!(
            long.storage_key() < short.storage_key(),
            "aaa should sort before ab despite longer length"
        );
    }

    #[test]
    fn test_row_prefix_covers_all_versions() {
        let row = RowId::new("row-a");
        let prefix = VersionKey::row_prefix(&row);

        for seq in [1_i64, 50, 9999] {
            let key = VersionKey::new(row.clone(), SavepointSeq::new(seq));
            assert!(
                key.storage_key().starts_with(&prefix),
                "version {} should live under the row prefix",
                seq
            );
        }

        let other = VersionKey::new(RowId::new("row-ab"), SavepointSeq::new(1));
        assert!(
            !other.storage_key().starts_with(&prefix),
            "a different row id must not match the prefix"
        );
    }
}
