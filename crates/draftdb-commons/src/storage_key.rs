//! Storage key trait for type-safe key serialization with lexicographic ordering.
//!
//! This module uses the `storekey` crate to ensure proper lexicographic
//! ordering of serialized keys in RocksDB.
//!
//! # Why storekey?
//!
//! RocksDB stores keys in lexicographic (byte-by-byte) order. Naive encoding
//! strategies like `{len:1byte}{string_bytes}` break ordering:
//!
//! - "bob" → [3, b, o, b] sorts BEFORE "alice" → [5, a, l, i, c, e]
//!   because 3 < 5, even though "alice" < "bob" lexicographically
//!
//! The `storekey` crate uses escape-sequence encoding that preserves the
//! natural lexicographic order of strings and tuples. For the version store
//! this matters twice over: all versions of one row must sit in a contiguous
//! key range, and within that range they must sort by savepoint sequence.

use storekey::{Decode, Encode};

/// Encode a value to bytes using storekey's order-preserving format.
///
/// The encoded bytes will sort in the same order as the original values
/// when compared lexicographically.
pub fn encode_key<T: Encode>(value: &T) -> Vec<u8> {
    storekey::encode_vec(value).expect("storekey encoding should not fail for valid types")
}

/// Encode a value as a prefix for range scans.
///
/// This is identical to `encode_key` but makes the intent clear when used for
/// prefix scans. For tuple encodings like `(row_id, seq)`, encode just the
/// prefix tuple `(row_id,)`.
pub fn encode_prefix<T: Encode>(value: &T) -> Vec<u8> {
    encode_key(value)
}

/// Decode a value from storekey-encoded bytes.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded to the expected type.
pub fn decode_key<T: Decode>(bytes: &[u8]) -> Result<T, String> {
    storekey::decode(&mut std::io::Cursor::new(bytes))
        .map_err(|e| format!("storekey decode error: {:?}", e))
}

/// Trait for keys that can be serialized for storage in the version store.
///
/// # Ordering Guarantees
///
/// Keys are serialized using `storekey` which preserves lexicographic
/// ordering: strings sort alphabetically, numbers numerically, and tuples
/// element-by-element. Composite keys MUST return the full composite
/// representation using `encode_key()` with a tuple.
pub trait StorageKey: Clone + Send + Sync + 'static {
    /// Serialize this key to bytes for storage using order-preserving encoding.
    fn storage_key(&self) -> Vec<u8>;

    /// Deserialize this key from bytes
    fn from_storage_key(bytes: &[u8]) -> Result<Self, String>
    where
        Self: Sized;
}

impl StorageKey for String {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(&self.as_str())
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key(bytes)
    }
}

impl StorageKey for i64 {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(self)
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key(bytes)
    }
}
