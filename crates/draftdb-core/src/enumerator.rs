//! Enumeration of rows with pending checkpoints.
//!
//! The enumerator produces a finite snapshot of the rows that still carry
//! checkpoint versions, ordered by row id as stored. The ordering matters
//! for list stability, never for correctness. Callers re-invoke it after
//! each batch to detect remaining work; it is not a live stream.

use crate::connection::Connection;
use crate::error::EnumerationError;
use draftdb_commons::{AppId, ResolveRowEntry, RowId, TableId};
use draftdb_store::StorageError;

/// List the rows of `table_id` that have at least one checkpoint version.
///
/// Returns one entry per pending row in stable row-id order. A load failure
/// is fatal for this refresh cycle; no partial list is returned.
pub fn list_pending_rows(
    conn: &Connection,
    table_id: &TableId,
) -> Result<Vec<ResolveRowEntry>, EnumerationError> {
    let store = conn.version_store(table_id);
    let versions = store.scan_table()?;

    let mut entries = Vec::new();
    let mut current: Option<(RowId, usize, String)> = None;

    for (key, version) in versions {
        let same_row = current
            .as_ref()
            .is_some_and(|(row_id, _, _)| row_id == key.row_id());

        if same_row {
            if version.is_checkpoint() {
                if let Some((_, checkpoints, last_saved)) = current.as_mut() {
                    *checkpoints += 1;
                    *last_saved = version.saved_at.to_rfc3339();
                }
            }
        } else {
            // Versions scan grouped by row, so a new row id means the
            // previous row is finished.
            if let Some(entry) = flush(current.take()) {
                entries.push(entry);
            }
            current = Some((
                key.row_id().clone(),
                usize::from(version.is_checkpoint()),
                version.saved_at.to_rfc3339(),
            ));
        }
    }
    if let Some(entry) = flush(current.take()) {
        entries.push(entry);
    }

    log::debug!(
        "enumerated pending rows: app={} session={} table={} pending={}",
        conn.app_id(),
        conn.session_id(),
        table_id,
        entries.len()
    );
    Ok(entries)
}

fn flush(row: Option<(RowId, usize, String)>) -> Option<ResolveRowEntry> {
    match row {
        Some((row_id, checkpoints, last_saved)) if checkpoints > 0 => Some(ResolveRowEntry::new(
            row_id,
            format!("{} checkpoint(s), last saved {}", checkpoints, last_saved),
        )),
        _ => None,
    }
}

/// Load the pending rows off the calling thread.
///
/// Acquires and releases its own connection on the blocking pool and
/// resolves with the finished list: the async seam between a caller's
/// control loop and the synchronous storage scan.
pub async fn load_pending_rows(
    factory: crate::connection::ConnectionFactory,
    app_id: AppId,
    table_id: TableId,
) -> Result<Vec<ResolveRowEntry>, EnumerationError> {
    tokio::task::spawn_blocking(move || {
        let conn = factory.acquire(&app_id, draftdb_commons::SessionId::generate())?;
        list_pending_rows(&conn, &table_id)
    })
    .await
    .map_err(|e| EnumerationError::Storage(StorageError::Other(format!("load task failed: {}", e))))?
}

/// The three-way branch a caller takes over a freshly loaded list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDisposition {
    /// No pending checkpoints: the table is fully resolved.
    FullyResolved,
    /// Exactly one pending row: go straight to single-row resolution,
    /// bypassing the batch view.
    Single(ResolveRowEntry),
    /// Multiple pending rows: present the full batch.
    Multiple(Vec<ResolveRowEntry>),
}

impl RowDisposition {
    /// Pure function of the loaded list.
    pub fn of(mut entries: Vec<ResolveRowEntry>) -> Self {
        match entries.len() {
            0 => RowDisposition::FullyResolved,
            1 => RowDisposition::Single(entries.remove(0)),
            _ => RowDisposition::Multiple(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionFactory;
    use draftdb_commons::SessionId;
    use draftdb_store::test_utils::TestDb;
    use draftdb_store::RocksDbBackend;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (ConnectionFactory, AppId, TableId, TestDb) {
        let test_db = TestDb::new(&[]).unwrap();
        let app = AppId::new("survey");
        let factory = ConnectionFactory::new();
        factory.register_app(app.clone(), Arc::new(RocksDbBackend::new(test_db.db.clone())));
        (factory, app, TableId::new("households"), test_db)
    }

    #[test]
    fn test_rows_without_checkpoints_are_excluded() {
        let (factory, app, table, _db) = setup();
        let conn = factory.acquire(&app, SessionId::generate()).unwrap();
        let store = conn.version_store(&table);

        // A: 3 checkpoints, B: 1 checkpoint, C: committed only
        store.append_checkpoint(&RowId::new("a"), json!({"v": 1})).unwrap();
        store.append_checkpoint(&RowId::new("a"), json!({"v": 2})).unwrap();
        store.append_checkpoint(&RowId::new("a"), json!({"v": 3})).unwrap();
        store.append_checkpoint(&RowId::new("b"), json!({"v": 1})).unwrap();
        store.put_committed(&RowId::new("c"), json!({"v": 1})).unwrap();

        let entries = list_pending_rows(&conn, &table).unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.row_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(entries[0].summary.starts_with("3 checkpoint(s)"));
        assert!(entries[1].summary.starts_with("1 checkpoint(s)"));
    }

    #[test]
    fn test_empty_table_enumerates_empty() {
        let (factory, app, table, _db) = setup();
        let conn = factory.acquire(&app, SessionId::generate()).unwrap();

        assert!(list_pending_rows(&conn, &table).unwrap().is_empty());
    }

    #[test]
    fn test_committed_base_with_checkpoints_counts_pending() {
        let (factory, app, table, _db) = setup();
        let conn = factory.acquire(&app, SessionId::generate()).unwrap();
        let store = conn.version_store(&table);

        store.put_committed(&RowId::new("a"), json!({"v": 0})).unwrap();
        store.append_checkpoint(&RowId::new("a"), json!({"v": 1})).unwrap();

        let entries = list_pending_rows(&conn, &table).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].row_id.as_str(), "a");
    }

    #[test]
    fn test_disposition_branches() {
        let entry = ResolveRowEntry::new(RowId::new("a"), "1 checkpoint(s)");

        assert_eq!(RowDisposition::of(vec![]), RowDisposition::FullyResolved);
        assert_eq!(
            RowDisposition::of(vec![entry.clone()]),
            RowDisposition::Single(entry.clone())
        );
        assert!(matches!(
            RowDisposition::of(vec![entry.clone(), entry]),
            RowDisposition::Multiple(ref v) if v.len() == 2
        ));
    }

    #[tokio::test]
    async fn test_async_load_releases_its_connection() {
        let (factory, app, table, _db) = setup();

        {
            let conn = factory.acquire(&app, SessionId::generate()).unwrap();
            let store = conn.version_store(&table);
            store.append_checkpoint(&RowId::new("a"), json!({"v": 1})).unwrap();
        }

        let entries = load_pending_rows(factory.clone(), app.clone(), table.clone())
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);

        // The loader's own session must be gone once the future resolves
        assert_eq!(factory.session_count(), 0);
        assert_eq!(factory.live_references(), 0);
    }

    #[tokio::test]
    async fn test_async_load_unknown_app_is_enumeration_error() {
        let factory = ConnectionFactory::new();
        let err = load_pending_rows(factory, AppId::new("ghost"), TableId::new("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnumerationError::Connection(_)));
    }
}
