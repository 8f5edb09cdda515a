//! Type-safe wrapper for row identifiers.

use crate::storage_key::{decode_key, encode_key};
use crate::StorageKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for row identifiers.
///
/// A row is identified by `(TableId, RowId)`; the row id alone is the unit
/// the resolver and enumerator pass around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(String);

impl RowId {
    /// Creates a new RowId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the row ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for RowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl StorageKey for RowId {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(&self.0.as_str())
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key::<String>(bytes).map(RowId)
    }
}
