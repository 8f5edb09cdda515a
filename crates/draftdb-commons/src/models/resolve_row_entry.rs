//! Pending-row handles produced by the enumerator.

use crate::ids::RowId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lightweight handle for one row pending checkpoint resolution.
///
/// Produced fresh by every enumeration pass and consumed by the resolver or
/// the batch driver; holds no database state beyond the row id and a short
/// display summary (checkpoint count, latest save time) for list UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRowEntry {
    pub row_id: RowId,
    /// Human-readable one-liner for list display.
    pub summary: String,
}

impl ResolveRowEntry {
    pub fn new(row_id: RowId, summary: impl Into<String>) -> Self {
        Self {
            row_id,
            summary: summary.into(),
        }
    }
}

impl fmt::Display for ResolveRowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.row_id, self.summary)
    }
}
