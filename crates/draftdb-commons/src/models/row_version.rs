//! Stored row version records.

use super::SavepointType;
use crate::ids::SavepointSeq;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One stored version of a row.
///
/// Versions are keyed by `(row_id, savepoint_seq)` in the table's version
/// partition; the record itself carries the savepoint type, the save
/// timestamp, and the column data as a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowVersion {
    /// Checkpoint or committed.
    pub savepoint_type: SavepointType,
    /// Strictly increasing save-order within the row; newest = highest.
    pub savepoint_seq: SavepointSeq,
    /// When this version was saved (ISO 8601).
    pub saved_at: DateTime<Utc>,
    /// Column values as a JSON object.
    pub data: JsonValue,
}

impl RowVersion {
    /// Create a checkpoint version saved now.
    pub fn checkpoint(seq: SavepointSeq, data: JsonValue) -> Self {
        Self {
            savepoint_type: SavepointType::Checkpoint,
            savepoint_seq: seq,
            saved_at: Utc::now(),
            data,
        }
    }

    /// Create a committed version saved now.
    pub fn complete(seq: SavepointSeq, data: JsonValue) -> Self {
        Self {
            savepoint_type: SavepointType::Complete,
            savepoint_seq: seq,
            saved_at: Utc::now(),
            data,
        }
    }

    /// True when this version is an in-progress checkpoint.
    pub fn is_checkpoint(&self) -> bool {
        self.savepoint_type.is_checkpoint()
    }

    /// Returns this version rewritten as the committed state of the row.
    ///
    /// Used by newest-wins resolution: content and save order are preserved,
    /// only the savepoint type changes.
    pub fn into_complete(self) -> Self {
        Self {
            savepoint_type: SavepointType::Complete,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_complete_preserves_content() {
        let v = RowVersion::checkpoint(SavepointSeq::new(3), json!({"name": "amy"}));
        let saved_at = v.saved_at;
        let committed = v.into_complete();

        assert_eq!(committed.savepoint_type, SavepointType::Complete);
        assert_eq!(committed.savepoint_seq, SavepointSeq::new(3));
        assert_eq!(committed.saved_at, saved_at);
        assert_eq!(committed.data, json!({"name": "amy"}));
    }

    #[test]
    fn test_serde_round_trip() {
        let v = RowVersion::complete(SavepointSeq::new(1), json!({"count": 2}));
        let bytes = serde_json::to_vec(&v).unwrap();
        let parsed: RowVersion = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, v);
    }
}
