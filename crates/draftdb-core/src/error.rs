//! Error taxonomy of the resolution core.
//!
//! Three failure classes with different propagation rules:
//!
//! - [`ConnectionError`]: acquiring a handle failed; fatal to the current
//!   batch step, propagates to the caller.
//! - [`ResolveError`]: one row's resolve operation failed; recovered
//!   locally by the batch driver (message captured, handle replaced, batch
//!   continues).
//! - [`EnumerationError`]: loading the pending-row list failed; fatal for
//!   that refresh cycle, no partial list is surfaced.

use draftdb_commons::{AppId, RowId};
use draftdb_store::StorageError;
use thiserror::Error;

/// Acquiring a connection handle failed.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("no database registered for app '{0}'")]
    UnknownApp(AppId),
}

/// An individual row's resolve operation failed.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The row has no checkpoint versions; committed state is untouched.
    #[error("nothing to resolve: row '{row_id}' has no checkpoints")]
    NothingToResolve { row_id: RowId },

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// Loading the set of pending rows failed.
#[derive(Debug, Error)]
pub enum EnumerationError {
    #[error("failed to load pending rows: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Failure of the standalone single-row resolution path, which owns its
/// connection lifecycle and can therefore fail either way.
#[derive(Debug, Error)]
pub enum SingleRowError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
