//! Checkpoint resolution operations.
//!
//! Two operations, symmetric in shape: collapse a row's checkpoint chain by
//! promoting the newest checkpoint to committed status, or discard the
//! chain and revert to the last committed state. Both run as one atomic
//! write through the caller-supplied connection; transaction scope is the
//! handle's responsibility, never managed here.
//!
//! "Newest" and "oldest" are the only two policies: checkpoints represent an
//! in-progress edit chain with no merge semantics, so the user either
//! accepts the latest edit or reverts entirely.

use crate::connection::Connection;
use crate::error::ResolveError;
use draftdb_commons::{RowId, TableId};
use draftdb_store::VersionOp;

/// Promote the row's most-recently-saved checkpoint to committed status.
///
/// All earlier versions of the row (older checkpoints and any prior
/// committed version) are discarded in the same write. Fails with
/// [`ResolveError::NothingToResolve`] if the row has no checkpoints;
/// committed state is untouched in that case.
pub fn resolve_as_newest(
    conn: &Connection,
    table_id: &TableId,
    row_id: &RowId,
) -> Result<(), ResolveError> {
    let store = conn.version_store(table_id);
    let versions = store.scan_row(row_id)?;

    let newest = versions
        .iter()
        .rfind(|(_, version)| version.is_checkpoint())
        .cloned()
        .ok_or_else(|| ResolveError::NothingToResolve {
            row_id: row_id.clone(),
        })?;

    let (newest_key, newest_version) = newest;

    // Delete the whole chain, then rewrite the newest checkpoint as the
    // committed state. Batch order matters: the promotion must land after
    // the delete of the same key.
    let mut ops: Vec<VersionOp> = versions
        .iter()
        .map(|(key, _)| VersionOp::Delete { key: key.clone() })
        .collect();
    ops.push(VersionOp::Put {
        key: newest_key,
        version: newest_version.into_complete(),
    });
    store.apply(ops)?;

    log::debug!(
        "resolved row as newest: app={} session={} table={} row={}",
        conn.app_id(),
        conn.session_id(),
        table_id,
        row_id
    );
    Ok(())
}

/// Discard all checkpoint versions of the row, reverting it to its last
/// committed state.
///
/// No promotion happens; if the row never had a committed version it becomes
/// absent. Fails with [`ResolveError::NothingToResolve`] if the row has no
/// checkpoints.
pub fn resolve_as_oldest(
    conn: &Connection,
    table_id: &TableId,
    row_id: &RowId,
) -> Result<(), ResolveError> {
    let store = conn.version_store(table_id);
    let versions = store.scan_row(row_id)?;

    let ops: Vec<VersionOp> = versions
        .iter()
        .filter(|(_, version)| version.is_checkpoint())
        .map(|(key, _)| VersionOp::Delete { key: key.clone() })
        .collect();

    if ops.is_empty() {
        return Err(ResolveError::NothingToResolve {
            row_id: row_id.clone(),
        });
    }
    store.apply(ops)?;

    log::debug!(
        "resolved row as oldest: app={} session={} table={} row={}",
        conn.app_id(),
        conn.session_id(),
        table_id,
        row_id
    );
    Ok(())
}
