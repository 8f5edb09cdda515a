//! Savepoint sequence numbers for row version ordering.

use crate::storage_key::{decode_key, encode_key};
use crate::StorageKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strictly increasing save-order of a row's versions.
///
/// The newest version of a row is the one with the highest sequence. The
/// sequence is per-row, assigned at save time by the writer; resolution only
/// relies on the ordering, never on the absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SavepointSeq(i64);

impl SavepointSeq {
    /// Create a SavepointSeq from a raw i64 value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw i64 value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// The sequence that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SavepointSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SavepointSeq {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<SavepointSeq> for i64 {
    fn from(seq: SavepointSeq) -> Self {
        seq.0
    }
}

impl StorageKey for SavepointSeq {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(&self.0)
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key::<i64>(bytes).map(SavepointSeq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        let s1 = SavepointSeq::new(100);
        let s2 = SavepointSeq::new(200);
        assert!(s1 < s2);
        assert!(s1.storage_key() < s2.storage_key());
    }

    #[test]
    fn test_next() {
        assert_eq!(SavepointSeq::new(7).next(), SavepointSeq::new(8));
    }

    #[test]
    fn test_round_trip() {
        let seq = SavepointSeq::new(123456789);
        let parsed = SavepointSeq::from_storage_key(&seq.storage_key()).unwrap();
        assert_eq!(seq, parsed);
    }
}
