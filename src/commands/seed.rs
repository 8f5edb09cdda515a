//! `draftdb seed`: populate a table with demo rows for local
//! experimentation. One long edit chain, one single-checkpoint row, and one
//! committed-only row.

use crate::lifecycle::AppHandle;
use anyhow::Result;
use draftdb_commons::{RowId, SessionId, TableId};
use serde_json::json;

pub fn run(handle: &AppHandle, table: &str) -> Result<()> {
    let table_id = TableId::try_new(table).map_err(anyhow::Error::msg)?;

    let conn = handle
        .factory
        .acquire(&handle.app_id, SessionId::generate())?;
    let store = conn.version_store(&table_id);

    let chain = RowId::new("row-edit-chain");
    store.put_committed(&chain, json!({"name": "Adams household", "visits": 2}))?;
    store.append_checkpoint(&chain, json!({"name": "Adams household", "visits": 3}))?;
    store.append_checkpoint(&chain, json!({"name": "Adams household", "visits": 4}))?;
    store.append_checkpoint(&chain, json!({"name": "Adams hh (renamed)", "visits": 4}))?;

    let single = RowId::new("row-single-draft");
    store.append_checkpoint(&single, json!({"name": "Baker household", "visits": 1}))?;

    let committed = RowId::new("row-committed");
    store.put_committed(&committed, json!({"name": "Clark household", "visits": 7}))?;

    println!(
        "Seeded '{}': 2 rows with pending checkpoints, 1 committed row.",
        table
    );
    Ok(())
}
