//! # draftdb-store
//!
//! Storage layer for DraftDB. This crate isolates all direct RocksDB
//! interactions behind a pluggable abstraction, keeping `draftdb-core`
//! free of engine dependencies.
//!
//! ## Architecture
//!
//! ```text
//! draftdb-core (resolution logic)
//!     ↓
//! VersionStore (typed row-version CRUD)
//!     ↓
//! StorageBackend (generic K/V operations)
//!     ↓
//! RocksDB (storage engine)
//! ```
//!
//! Row versions for a table live in partition `row_versions:{app}:{table}`,
//! keyed by the order-preserving encoding of `(row_id, savepoint_seq)`.

pub mod rocksdb_impl;
pub mod rocksdb_init;
pub mod storage_trait;
pub mod test_utils;
pub mod version_store;

pub use rocksdb_impl::RocksDbBackend;
pub use rocksdb_init::{RocksDbInit, RocksDbSettings};
pub use storage_trait::{KvIterator, Operation, Partition, StorageBackend, StorageError};
pub use version_store::{VersionOp, VersionStore};
