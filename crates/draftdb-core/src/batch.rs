//! Bulk resolution driver.
//!
//! Processes an enumerated list of pending rows strictly in order, with no
//! parallelism across rows. Row-level failures never abort the batch: the
//! message is captured, the connection handle is discarded and replaced
//! under a fresh session id, and processing continues. The accumulated
//! messages surface once, after the loop, as a single multi-line report.
//! Rows resolved before a failure stay resolved; there is no batch
//! rollback and no mid-batch cancellation point.

use crate::connection::ConnectionFactory;
use crate::error::{ConnectionError, ResolveError, SingleRowError};
use crate::resolver::{resolve_as_newest, resolve_as_oldest};
use draftdb_commons::{AppId, ResolveRowEntry, RowId, SessionId, TableId};

/// Which way a row's checkpoint chain is collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvePolicy {
    /// Promote the newest checkpoint to committed status.
    TakeNewest,
    /// Discard all checkpoints, reverting to the last committed state.
    TakeOldest,
}

/// One row's captured failure.
#[derive(Debug, Clone)]
pub struct RowFailure {
    pub row_id: RowId,
    pub message: String,
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Rows successfully resolved.
    pub resolved: usize,
    /// Per-row failures, in processing order.
    pub failures: Vec<RowFailure>,
}

impl BatchOutcome {
    /// True when every row resolved.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// All failure messages joined into one human-readable report, or
    /// `None` for a clean batch. The batch is not rolled back on failure,
    /// so the report is informational, not transactional.
    pub fn failure_report(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        Some(
            self.failures
                .iter()
                .map(|f| f.message.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

/// Drives bulk and single-row resolution for one `(app, table)` pair.
pub struct BatchResolver {
    factory: ConnectionFactory,
    app_id: AppId,
    table_id: TableId,
}

impl BatchResolver {
    pub fn new(factory: ConnectionFactory, app_id: AppId, table_id: TableId) -> Self {
        Self {
            factory,
            app_id,
            table_id,
        }
    }

    /// Resolve every listed row by promoting its newest checkpoint.
    pub fn take_all_newest(
        &self,
        entries: &[ResolveRowEntry],
    ) -> Result<BatchOutcome, ConnectionError> {
        self.run(entries, ResolvePolicy::TakeNewest)
    }

    /// Resolve every listed row by reverting to its last committed state.
    pub fn take_all_oldest(
        &self,
        entries: &[ResolveRowEntry],
    ) -> Result<BatchOutcome, ConnectionError> {
        self.run(entries, ResolvePolicy::TakeOldest)
    }

    /// Resolve one row under its own short-lived connection.
    ///
    /// The path taken when exactly one row is pending, and by per-row
    /// resolution screens.
    pub fn resolve_single_row(
        &self,
        row_id: &RowId,
        policy: ResolvePolicy,
    ) -> Result<(), SingleRowError> {
        let conn = self.factory.acquire(&self.app_id, SessionId::generate())?;
        let result = self.resolve_one(&conn, row_id, policy);
        conn.release();
        result.map_err(SingleRowError::from)
    }

    fn run(
        &self,
        entries: &[ResolveRowEntry],
        policy: ResolvePolicy,
    ) -> Result<BatchOutcome, ConnectionError> {
        let mut conn = self.factory.acquire(&self.app_id, SessionId::generate())?;
        let mut outcome = BatchOutcome::default();

        for entry in entries {
            match self.resolve_one(&conn, &entry.row_id, policy) {
                Ok(()) => outcome.resolved += 1,
                Err(err) => {
                    let message = failure_message(&err);
                    log::error!(
                        "resolve failed: app={} session={} row={} {}",
                        self.app_id,
                        conn.session_id(),
                        entry.row_id,
                        message
                    );
                    outcome.failures.push(RowFailure {
                        row_id: entry.row_id.clone(),
                        message,
                    });

                    // Release the possibly-poisoned handle before opening a
                    // replacement under a fresh session id, whatever the
                    // failure was. Acquire failure here is fatal to the
                    // batch; the old handle is already released.
                    conn.release();
                    conn = self.factory.acquire(&self.app_id, SessionId::generate())?;
                }
            }
        }

        conn.release();

        log::info!(
            "batch resolution finished: app={} table={} policy={:?} resolved={} failed={}",
            self.app_id,
            self.table_id,
            policy,
            outcome.resolved,
            outcome.failures.len()
        );
        Ok(outcome)
    }

    fn resolve_one(
        &self,
        conn: &crate::connection::Connection,
        row_id: &RowId,
        policy: ResolvePolicy,
    ) -> Result<(), ResolveError> {
        match policy {
            ResolvePolicy::TakeNewest => resolve_as_newest(conn, &self.table_id, row_id),
            ResolvePolicy::TakeOldest => resolve_as_oldest(conn, &self.table_id, row_id),
        }
    }
}

/// Message for a captured row failure: the error's display form, or its
/// debug form when the display is empty.
fn failure_message(err: &ResolveError) -> String {
    let message = err.to_string();
    if message.is_empty() {
        format!("{:?}", err)
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftdb_store::test_utils::TestDb;
    use draftdb_store::RocksDbBackend;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (BatchResolver, ConnectionFactory, AppId, TableId, TestDb) {
        let test_db = TestDb::new(&[]).unwrap();
        let app = AppId::new("survey");
        let table = TableId::new("households");
        let factory = ConnectionFactory::new();
        factory.register_app(app.clone(), Arc::new(RocksDbBackend::new(test_db.db.clone())));
        let resolver = BatchResolver::new(factory.clone(), app.clone(), table.clone());
        (resolver, factory, app, table, test_db)
    }

    fn seed_pending(
        factory: &ConnectionFactory,
        app: &AppId,
        table: &TableId,
        rows: &[(&str, usize)],
    ) {
        let conn = factory.acquire(app, SessionId::generate()).unwrap();
        let store = conn.version_store(table);
        for (row, checkpoints) in rows {
            for n in 0..*checkpoints {
                store
                    .append_checkpoint(&RowId::new(*row), json!({"edit": n}))
                    .unwrap();
            }
        }
    }

    fn entries(rows: &[&str]) -> Vec<ResolveRowEntry> {
        rows.iter()
            .map(|r| ResolveRowEntry::new(RowId::new(*r), "pending"))
            .collect()
    }

    #[test]
    fn test_take_all_newest_resolves_every_row() {
        let (resolver, factory, app, table, _db) = setup();
        seed_pending(&factory, &app, &table, &[("a", 3), ("b", 1)]);

        let outcome = resolver.take_all_newest(&entries(&["a", "b"])).unwrap();
        assert!(outcome.is_clean());
        assert_eq!(outcome.resolved, 2);

        let conn = factory.acquire(&app, SessionId::generate()).unwrap();
        assert!(crate::enumerator::list_pending_rows(&conn, &table)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_take_all_oldest_resolves_every_row() {
        let (resolver, factory, app, table, _db) = setup();
        seed_pending(&factory, &app, &table, &[("a", 2), ("b", 1)]);

        let outcome = resolver.take_all_oldest(&entries(&["a", "b"])).unwrap();
        assert!(outcome.is_clean());
        assert_eq!(outcome.resolved, 2);

        let conn = factory.acquire(&app, SessionId::generate()).unwrap();
        assert!(crate::enumerator::list_pending_rows(&conn, &table)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_failed_row_does_not_abort_batch() {
        let (resolver, factory, app, table, _db) = setup();
        // "missing" has no checkpoints and will fail mid-batch
        seed_pending(&factory, &app, &table, &[("a", 1), ("c", 2)]);

        let outcome = resolver
            .take_all_newest(&entries(&["a", "missing", "c"]))
            .unwrap();

        assert_eq!(outcome.resolved, 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].row_id.as_str(), "missing");

        let report = outcome.failure_report().unwrap();
        assert!(report.contains("missing"));

        // Rows before and after the failure are resolved
        let conn = factory.acquire(&app, SessionId::generate()).unwrap();
        assert!(crate::enumerator::list_pending_rows(&conn, &table)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_multiple_failures_aggregate_into_one_report() {
        let (resolver, factory, app, table, _db) = setup();
        seed_pending(&factory, &app, &table, &[("b", 1)]);

        let outcome = resolver
            .take_all_oldest(&entries(&["ghost1", "b", "ghost2"]))
            .unwrap();

        assert_eq!(outcome.resolved, 1);
        assert_eq!(outcome.failures.len(), 2);
        let report = outcome.failure_report().unwrap();
        assert_eq!(report.lines().count(), 2);
        assert!(report.contains("ghost1"));
        assert!(report.contains("ghost2"));
    }

    #[test]
    fn test_clean_batch_has_no_report() {
        let (resolver, factory, app, table, _db) = setup();
        seed_pending(&factory, &app, &table, &[("a", 1)]);

        let outcome = resolver.take_all_newest(&entries(&["a"])).unwrap();
        assert!(outcome.failure_report().is_none());
    }

    #[test]
    fn test_all_handles_released_after_batch_with_failures() {
        let (resolver, factory, app, table, _db) = setup();
        seed_pending(&factory, &app, &table, &[("a", 1)]);

        resolver
            .take_all_newest(&entries(&["ghost", "a", "ghost2"]))
            .unwrap();

        // Every acquisition in the loop, including the reconnects, must be
        // balanced by exactly one release.
        assert_eq!(factory.session_count(), 0);
        assert_eq!(factory.live_references(), 0);
    }

    #[test]
    fn test_batch_on_unregistered_app_propagates_connection_error() {
        let factory = ConnectionFactory::new();
        let resolver = BatchResolver::new(
            factory,
            AppId::new("ghost-app"),
            TableId::new("t"),
        );

        let err = resolver.take_all_newest(&entries(&["a"])).unwrap_err();
        assert!(matches!(err, ConnectionError::UnknownApp(_)));
    }

    #[test]
    fn test_resolve_single_row_releases_its_connection() {
        let (resolver, factory, app, table, _db) = setup();
        seed_pending(&factory, &app, &table, &[("only", 2)]);

        resolver
            .resolve_single_row(&RowId::new("only"), ResolvePolicy::TakeNewest)
            .unwrap();

        assert_eq!(factory.session_count(), 0);

        let conn = factory.acquire(&app, SessionId::generate()).unwrap();
        assert!(crate::enumerator::list_pending_rows(&conn, &table)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_resolve_single_row_error_still_releases() {
        let (resolver, factory, _app, _table, _db) = setup();

        let err = resolver
            .resolve_single_row(&RowId::new("ghost"), ResolvePolicy::TakeOldest)
            .unwrap_err();
        assert!(matches!(err, SingleRowError::Resolve(_)));
        assert_eq!(factory.session_count(), 0);
    }

    #[test]
    fn test_empty_batch_is_clean() {
        let (resolver, factory, _app, _table, _db) = setup();

        let outcome = resolver.take_all_newest(&[]).unwrap();
        assert!(outcome.is_clean());
        assert_eq!(outcome.resolved, 0);
        assert_eq!(factory.session_count(), 0);
    }
}
