//! RocksDB initialization utilities for DraftDB.
//!
//! Provides a thin helper to open a RocksDB instance with its existing
//! column families discovered from disk.

use anyhow::Result;
use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options, DB};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// RocksDB tuning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbSettings {
    /// Write buffer size per column family in bytes (default: 16MB)
    #[serde(default = "default_write_buffer_size")]
    pub write_buffer_size: usize,

    /// Maximum number of write buffers (default: 3)
    #[serde(default = "default_max_write_buffers")]
    pub max_write_buffers: i32,

    /// Block cache size for reads in bytes (default: 64MB)
    #[serde(default = "default_block_cache_size")]
    pub block_cache_size: usize,

    /// Maximum number of background jobs (default: 2)
    #[serde(default = "default_max_background_jobs")]
    pub max_background_jobs: i32,
}

fn default_write_buffer_size() -> usize {
    16 * 1024 * 1024
}

fn default_max_write_buffers() -> i32 {
    3
}

fn default_block_cache_size() -> usize {
    64 * 1024 * 1024
}

fn default_max_background_jobs() -> i32 {
    2
}

impl Default for RocksDbSettings {
    fn default() -> Self {
        Self {
            write_buffer_size: default_write_buffer_size(),
            max_write_buffers: default_max_write_buffers(),
            block_cache_size: default_block_cache_size(),
            max_background_jobs: default_max_background_jobs(),
        }
    }
}

/// RocksDB initializer for creating/opening an application database.
///
/// Version partitions are created lazily as tables are first written, so
/// opening only needs to re-attach the column families already on disk.
pub struct RocksDbInit {
    db_path: String,
    settings: RocksDbSettings,
}

impl RocksDbInit {
    /// Create a new initializer for the given path with custom settings.
    pub fn new(db_path: impl Into<String>, settings: RocksDbSettings) -> Self {
        Self {
            db_path: db_path.into(),
            settings,
        }
    }

    /// Create a new initializer with default settings.
    pub fn with_defaults(db_path: impl Into<String>) -> Self {
        Self::new(db_path, RocksDbSettings::default())
    }

    /// Open or create the RocksDB database, re-attaching existing column
    /// families.
    pub fn open(&self) -> Result<Arc<DB>> {
        let path = Path::new(&self.db_path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        db_opts.set_write_buffer_size(self.settings.write_buffer_size);
        db_opts.set_max_write_buffer_number(self.settings.max_write_buffers);
        db_opts.set_max_background_jobs(self.settings.max_background_jobs);
        db_opts.increase_parallelism(self.settings.max_background_jobs);

        // Block cache is shared across all column families, so per-table
        // version partitions do not multiply cache memory.
        let cache = Cache::new_lru_cache(self.settings.block_cache_size);
        let block_opts = create_block_options_with_cache(&cache);
        db_opts.set_block_based_table_factory(&block_opts);

        // Existing CFs on disk (or just default for a fresh database)
        let existing = match DB::list_cf(&db_opts, path) {
            Ok(cfs) if !cfs.is_empty() => cfs,
            _ => vec!["default".to_string()],
        };

        let cf_descriptors: Vec<_> = existing
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_write_buffer_size(self.settings.write_buffer_size);
                cf_opts.set_max_write_buffer_number(self.settings.max_write_buffers);
                cf_opts.set_block_based_table_factory(&create_block_options_with_cache(&cache));
                ColumnFamilyDescriptor::new(name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;
        log::debug!(
            "RocksDB opened at {} with {} column families",
            self.db_path,
            existing.len()
        );

        Ok(Arc::new(db))
    }
}

fn create_block_options_with_cache(cache: &Cache) -> BlockBasedOptions {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    // Bloom + cached metadata improve the point/prefix lookups the version
    // store leans on.
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);
    block_opts
}
