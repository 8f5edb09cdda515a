//! Typed identifiers used across DraftDB.
//!
//! Newtype wrappers prevent the classic wrong-argument bugs (passing a row
//! id where a table id is expected compiles with raw strings, not with
//! these). Identifiers that serve as storage keys implement [`StorageKey`]
//! with order-preserving encoding.
//!
//! [`StorageKey`]: crate::storage_key::StorageKey

mod app_id;
mod row_id;
mod savepoint_seq;
mod session_id;
mod table_id;
mod version_key;

pub use app_id::AppId;
pub use row_id::RowId;
pub use savepoint_seq::SavepointSeq;
pub use session_id::SessionId;
pub use table_id::TableId;
pub use version_key::VersionKey;
