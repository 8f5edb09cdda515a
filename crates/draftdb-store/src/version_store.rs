//! Versioned row storage for application tables.
//!
//! Every table's versions live in their own partition named
//! `row_versions:{app}:{table}`. Keys are the order-preserving encoding of
//! `(row_id, savepoint_seq)`, so one row's versions form a contiguous,
//! save-ordered key range and a full-partition scan yields rows grouped
//! together in stable row-id order.

use crate::storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};
use draftdb_commons::{AppId, RowId, RowVersion, SavepointSeq, StorageKey, TableId, VersionKey};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Partition holding the version records of one table.
pub fn version_partition(app_id: &AppId, table_id: &TableId) -> Partition {
    Partition::new(format!("row_versions:{}:{}", app_id, table_id))
}

/// A single typed operation applied through [`VersionStore::apply`].
#[derive(Debug, Clone)]
pub enum VersionOp {
    Put { key: VersionKey, version: RowVersion },
    Delete { key: VersionKey },
}

/// Typed CRUD over [`RowVersion`] records for one `(app, table)` pair.
///
/// Writes that introduce new rows create the partition lazily; reads on a
/// table that was never written treat the missing partition as empty rather
/// than failing, since "no writes yet" and "no pending rows" coincide.
pub struct VersionStore {
    backend: Arc<dyn StorageBackend>,
    partition: Partition,
}

impl VersionStore {
    /// Create a store for the given table.
    pub fn new(backend: Arc<dyn StorageBackend>, app_id: &AppId, table_id: &TableId) -> Self {
        let partition = version_partition(app_id, table_id);
        Self { backend, partition }
    }

    /// The partition this store reads and writes.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    fn serialize(&self, version: &RowVersion) -> Result<Vec<u8>> {
        serde_json::to_vec(version).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<RowVersion> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// Store a version record under its key, creating the partition if needed.
    pub fn put(&self, key: &VersionKey, version: &RowVersion) -> Result<()> {
        self.backend.create_partition(&self.partition)?;
        let value = self.serialize(version)?;
        self.backend.put(&self.partition, &key.storage_key(), &value)
    }

    /// Retrieve one version record.
    pub fn get(&self, key: &VersionKey) -> Result<Option<RowVersion>> {
        if !self.backend.partition_exists(&self.partition) {
            return Ok(None);
        }
        match self.backend.get(&self.partition, &key.storage_key())? {
            Some(bytes) => Ok(Some(self.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All versions of one row, oldest first.
    pub fn scan_row(&self, row_id: &RowId) -> Result<Vec<(VersionKey, RowVersion)>> {
        if !self.backend.partition_exists(&self.partition) {
            return Ok(Vec::new());
        }

        let prefix = VersionKey::row_prefix(row_id);
        let mut results = Vec::new();
        for (key_bytes, value_bytes) in
            self.backend.scan(&self.partition, Some(&prefix), None)?
        {
            let key = VersionKey::from_storage_key(&key_bytes)
                .map_err(StorageError::SerializationError)?;
            let version = self.deserialize(&value_bytes)?;
            results.push((key, version));
        }
        Ok(results)
    }

    /// All versions in the table, grouped by row in key order.
    pub fn scan_table(&self) -> Result<Vec<(VersionKey, RowVersion)>> {
        if !self.backend.partition_exists(&self.partition) {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for (key_bytes, value_bytes) in self.backend.scan(&self.partition, None, None)? {
            let key = VersionKey::from_storage_key(&key_bytes)
                .map_err(StorageError::SerializationError)?;
            let version = self.deserialize(&value_bytes)?;
            results.push((key, version));
        }
        Ok(results)
    }

    /// Highest savepoint sequence stored for a row, if any.
    pub fn latest_seq(&self, row_id: &RowId) -> Result<Option<SavepointSeq>> {
        Ok(self.scan_row(row_id)?.last().map(|(key, _)| key.seq()))
    }

    /// Append a checkpoint version for a row, assigning the next sequence.
    pub fn append_checkpoint(&self, row_id: &RowId, data: JsonValue) -> Result<SavepointSeq> {
        let seq = match self.latest_seq(row_id)? {
            Some(latest) => latest.next(),
            None => SavepointSeq::new(1),
        };
        let key = VersionKey::new(row_id.clone(), seq);
        self.put(&key, &RowVersion::checkpoint(seq, data))?;
        Ok(seq)
    }

    /// Write a committed version for a row, assigning the next sequence.
    ///
    /// Used to seed base state; a row edited afterwards stacks checkpoints
    /// above this version.
    pub fn put_committed(&self, row_id: &RowId, data: JsonValue) -> Result<SavepointSeq> {
        let seq = match self.latest_seq(row_id)? {
            Some(latest) => latest.next(),
            None => SavepointSeq::new(1),
        };
        let key = VersionKey::new(row_id.clone(), seq);
        self.put(&key, &RowVersion::complete(seq, data))?;
        Ok(seq)
    }

    /// Apply a set of typed operations atomically.
    ///
    /// Either all operations are applied or none are; the resolver relies on
    /// this to collapse a checkpoint chain in one write.
    pub fn apply(&self, ops: Vec<VersionOp>) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }
        self.backend.create_partition(&self.partition)?;

        let mut operations = Vec::with_capacity(ops.len());
        for op in ops {
            operations.push(match op {
                VersionOp::Put { key, version } => Operation::Put {
                    partition: self.partition.clone(),
                    key: key.storage_key(),
                    value: self.serialize(&version)?,
                },
                VersionOp::Delete { key } => Operation::Delete {
                    partition: self.partition.clone(),
                    key: key.storage_key(),
                },
            });
        }

        self.backend.batch(operations)
    }
}
