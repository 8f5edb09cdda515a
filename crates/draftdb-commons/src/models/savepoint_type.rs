//! Savepoint type of a stored row version.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a stored row version is an in-progress checkpoint or the
/// committed state of the row.
///
/// A row has at most one `Complete` version and any number of `Checkpoint`
/// versions stacked above it. Rows with at least one checkpoint are
/// "pending" and must be resolved before the table is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SavepointType {
    /// An intermediate, not-yet-committed save of an edit in progress.
    Checkpoint,
    /// The committed (definitive) state of the row.
    Complete,
}

impl SavepointType {
    /// True for checkpoint versions.
    pub fn is_checkpoint(&self) -> bool {
        matches!(self, SavepointType::Checkpoint)
    }
}

impl fmt::Display for SavepointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavepointType::Checkpoint => write!(f, "CHECKPOINT"),
            SavepointType::Complete => write!(f, "COMPLETE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&SavepointType::Checkpoint).unwrap();
        assert_eq!(json, "\"CHECKPOINT\"");

        let parsed: SavepointType = serde_json::from_str("\"COMPLETE\"").unwrap();
        assert_eq!(parsed, SavepointType::Complete);
    }

    #[test]
    fn test_is_checkpoint() {
        assert!(SavepointType::Checkpoint.is_checkpoint());
        assert!(!SavepointType::Complete.is_checkpoint());
    }
}
