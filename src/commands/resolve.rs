//! `draftdb resolve`: collapse pending checkpoint chains.

use crate::lifecycle::AppHandle;
use anyhow::Result;
use draftdb_commons::{RowId, TableId};
use draftdb_core::{load_pending_rows, BatchResolver, ResolvePolicy, RowDisposition};

pub async fn run(
    handle: &AppHandle,
    table: &str,
    policy: ResolvePolicy,
    row: Option<String>,
) -> Result<()> {
    let table_id = TableId::try_new(table).map_err(anyhow::Error::msg)?;
    let resolver = BatchResolver::new(
        handle.factory.clone(),
        handle.app_id.clone(),
        table_id.clone(),
    );

    // Explicit single-row resolution, the per-row screen analog
    if let Some(row) = row {
        let row_id = RowId::new(row);
        resolver.resolve_single_row(&row_id, policy)?;
        println!("Resolved row '{}'.", row_id);
        return report_remaining(handle, &table_id).await;
    }

    let entries = load_pending_rows(
        handle.factory.clone(),
        handle.app_id.clone(),
        table_id.clone(),
    )
    .await?;

    match RowDisposition::of(entries) {
        RowDisposition::FullyResolved => {
            println!("Nothing to resolve: table '{}' has no pending checkpoints.", table);
            return Ok(());
        }
        RowDisposition::Single(entry) => {
            // One ambiguous row: skip the batch path entirely
            resolver.resolve_single_row(&entry.row_id, policy)?;
            println!("Resolved the only pending row '{}'.", entry.row_id);
        }
        RowDisposition::Multiple(entries) => {
            let outcome = match policy {
                ResolvePolicy::TakeNewest => resolver.take_all_newest(&entries)?,
                ResolvePolicy::TakeOldest => resolver.take_all_oldest(&entries)?,
            };
            println!("Resolved {} of {} rows.", outcome.resolved, entries.len());
            // Row failures are non-fatal: surface the aggregated report and
            // keep going, rows resolved before a failure stay resolved.
            if let Some(report) = outcome.failure_report() {
                eprintln!("Some rows failed to resolve:\n{}", report);
            }
        }
    }

    report_remaining(handle, &table_id).await
}

async fn report_remaining(handle: &AppHandle, table_id: &TableId) -> Result<()> {
    let remaining = load_pending_rows(
        handle.factory.clone(),
        handle.app_id.clone(),
        table_id.clone(),
    )
    .await?;

    if remaining.is_empty() {
        println!("Table '{}' is fully resolved.", table_id);
    } else {
        println!("{} rows still pending in '{}'.", remaining.len(), table_id);
    }
    Ok(())
}
