//! Test utilities for draftdb-store.
//!
//! Provides helpers for setting up test databases with minimal boilerplate.

use anyhow::Result;
use rocksdb::{Options, DB};
use std::sync::Arc;
use tempfile::TempDir;

/// Test database wrapper that automatically cleans up on drop.
pub struct TestDb {
    /// RocksDB instance
    pub db: Arc<DB>,
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with the specified column families.
    ///
    /// Version partitions are usually created lazily by the stores under
    /// test, so an empty list is the common case.
    pub fn new(cf_names: &[&str]) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, temp_dir.path(), cf_names)?;

        Ok(Self {
            db: Arc::new(db),
            temp_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_db() {
        let test_db = TestDb::new(&["row_versions:survey:households"]).unwrap();

        let cf = test_db.db.cf_handle("row_versions:survey:households");
        assert!(cf.is_some());
    }
}
