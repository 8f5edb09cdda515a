//! `draftdb status`: show the table's pending checkpoint rows.

use crate::lifecycle::AppHandle;
use anyhow::Result;
use draftdb_commons::TableId;
use draftdb_core::{load_pending_rows, RowDisposition};

pub async fn run(handle: &AppHandle, table: &str) -> Result<()> {
    let table_id = TableId::try_new(table).map_err(anyhow::Error::msg)?;

    let entries =
        load_pending_rows(handle.factory.clone(), handle.app_id.clone(), table_id).await?;

    match RowDisposition::of(entries) {
        RowDisposition::FullyResolved => {
            println!("Table '{}' has no pending checkpoints.", table);
        }
        RowDisposition::Single(entry) => {
            println!("Table '{}' has exactly one pending row:", table);
            println!("  {}", entry);
            println!("Resolve it directly with: draftdb resolve --table {} --row {}", table, entry.row_id);
        }
        RowDisposition::Multiple(entries) => {
            println!("Table '{}' has {} pending rows:", table, entries.len());
            for entry in &entries {
                println!("  {}", entry);
            }
        }
    }

    Ok(())
}
