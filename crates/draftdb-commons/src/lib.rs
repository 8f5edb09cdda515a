//! # draftdb-commons
//!
//! Shared types for DraftDB, free of storage-engine dependencies:
//!
//! - Typed identifiers (`AppId`, `TableId`, `RowId`, `SessionId`, ...)
//! - Row version models (`RowVersion`, `SavepointType`, `ResolveRowEntry`)
//! - The `StorageKey` trait and order-preserving key encoding helpers
//! - The dependency-free `CommonError` shared error type

pub mod errors;
pub mod ids;
pub mod models;
pub mod storage_key;

pub use errors::CommonError;
pub use ids::{AppId, RowId, SavepointSeq, SessionId, TableId, VersionKey};
pub use models::{ResolveRowEntry, RowVersion, SavepointType};
pub use storage_key::{decode_key, encode_key, encode_prefix, StorageKey};
