//! Tool lifecycle helpers.
//!
//! Encapsulates the bootstrap previously sketched in `main.rs`: opening the
//! application's RocksDB database and wiring the connection factory the
//! resolution core runs against.

use crate::config::ToolConfig;
use anyhow::{Context, Result};
use draftdb_commons::AppId;
use draftdb_core::ConnectionFactory;
use draftdb_store::{RocksDbBackend, RocksDbInit};
use log::info;
use std::sync::Arc;

/// Bootstrapped components shared by every command.
pub struct AppHandle {
    pub app_id: AppId,
    pub factory: ConnectionFactory,
}

/// Open (or create) the application database and register it with a fresh
/// connection factory.
pub fn bootstrap(config: &ToolConfig, app: &str) -> Result<AppHandle> {
    let app_id = AppId::try_new(app).map_err(anyhow::Error::msg)?;

    let db_path = config.app_db_path(app_id.as_str());
    std::fs::create_dir_all(&db_path)
        .with_context(|| format!("failed to create {}", db_path.display()))?;

    let started = std::time::Instant::now();
    let db_init = RocksDbInit::new(
        db_path.to_string_lossy().into_owned(),
        config.storage.rocksdb.clone(),
    );
    let db = db_init.open()?;
    info!(
        "database opened: app={} path={} ({:.2}ms)",
        app_id,
        db_path.display(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    let factory = ConnectionFactory::new();
    factory.register_app(app_id.clone(), Arc::new(RocksDbBackend::new(db)));

    Ok(AppHandle { app_id, factory })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ToolConfig {
        let mut config = ToolConfig::default();
        config.storage.data_dir = dir.path().to_string_lossy().into_owned();
        config
    }

    #[test]
    fn test_bootstrap_creates_database() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let handle = bootstrap(&config, "survey").unwrap();
        assert_eq!(handle.app_id.as_str(), "survey");
        assert!(dir.path().join("survey").exists());
    }

    #[test]
    fn test_bootstrap_rejects_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        assert!(bootstrap(&config, "../evil").is_err());
        assert!(bootstrap(&config, "").is_err());
    }
}
