//! Reference-counted database connection handles.
//!
//! The factory is a passed-in dependency, never an ambient singleton, so
//! tests and callers can wire their own backends. Each logical session is
//! identified by a generated [`SessionId`]; acquiring returns a fresh
//! reference (+1 refcount) and every [`Connection`] releases exactly one
//! reference when dropped, on success and failure paths alike.
//!
//! Releasing does not guarantee the underlying session is closed or any
//! pending work finalized, only that this caller's claim is relinquished.
//! When the last reference drops, the session is removed from the registry.

use crate::error::ConnectionError;
use dashmap::DashMap;
use draftdb_commons::{AppId, SessionId, TableId};
use draftdb_store::{StorageBackend, VersionStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct SessionState {
    session_id: SessionId,
    app_id: AppId,
    backend: Arc<dyn StorageBackend>,
    refcount: AtomicUsize,
}

struct FactoryInner {
    /// Registered application databases: AppId → backend
    apps: DashMap<AppId, Arc<dyn StorageBackend>>,
    /// Live sessions: SessionId → state
    sessions: DashMap<SessionId, Arc<SessionState>>,
    /// Live references across all sessions
    total_references: AtomicUsize,
}

/// Factory for reference-counted connections to per-application databases.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct ConnectionFactory {
    inner: Arc<FactoryInner>,
}

impl ConnectionFactory {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FactoryInner {
                apps: DashMap::new(),
                sessions: DashMap::new(),
                total_references: AtomicUsize::new(0),
            }),
        }
    }

    /// Register the storage backend for an application database.
    pub fn register_app(&self, app_id: AppId, backend: Arc<dyn StorageBackend>) {
        log::debug!("registered app database: {}", app_id);
        self.inner.apps.insert(app_id, backend);
    }

    /// Obtain a connection for `app_id` under the given session id.
    ///
    /// A new session id opens a fresh session with refcount 1; an existing
    /// one returns another reference to the same session. Failure to acquire
    /// (unknown app) is fatal to the caller's current operation; there is
    /// no handle to release.
    pub fn acquire(
        &self,
        app_id: &AppId,
        session_id: SessionId,
    ) -> Result<Connection, ConnectionError> {
        if let Some(existing) = self.inner.sessions.get(&session_id) {
            let state = Arc::clone(existing.value());
            drop(existing);
            state.refcount.fetch_add(1, Ordering::AcqRel);
            self.inner.total_references.fetch_add(1, Ordering::AcqRel);
            log::debug!(
                "acquired additional reference: app={} session={}",
                state.app_id,
                state.session_id
            );
            return Ok(Connection {
                state,
                registry: Arc::clone(&self.inner),
            });
        }

        let backend = self
            .inner
            .apps
            .get(app_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ConnectionError::UnknownApp(app_id.clone()))?;

        let state = Arc::new(SessionState {
            session_id: session_id.clone(),
            app_id: app_id.clone(),
            backend,
            refcount: AtomicUsize::new(1),
        });
        self.inner.sessions.insert(session_id.clone(), Arc::clone(&state));
        self.inner.total_references.fetch_add(1, Ordering::AcqRel);
        log::debug!("opened session: app={} session={}", app_id, session_id);

        Ok(Connection {
            state,
            registry: Arc::clone(&self.inner),
        })
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }

    /// Live references across all sessions.
    pub fn live_references(&self) -> usize {
        self.inner.total_references.load(Ordering::Acquire)
    }

    /// Current refcount of one session, if it is live.
    pub fn refcount(&self, session_id: &SessionId) -> Option<usize> {
        self.inner
            .sessions
            .get(session_id)
            .map(|entry| entry.refcount.load(Ordering::Acquire))
    }
}

impl Default for ConnectionFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// One reference to a database session.
///
/// Dropping the connection releases this caller's claim; the value cannot be
/// used afterwards, which enforces the must-not-use-after-release invariant
/// at compile time.
pub struct Connection {
    state: Arc<SessionState>,
    registry: Arc<FactoryInner>,
}

impl Connection {
    pub fn session_id(&self) -> &SessionId {
        &self.state.session_id
    }

    pub fn app_id(&self) -> &AppId {
        &self.state.app_id
    }

    /// Version store for one of this app's tables, bound to this session's
    /// backend.
    pub fn version_store(&self, table_id: &TableId) -> VersionStore {
        VersionStore::new(Arc::clone(&self.state.backend), &self.state.app_id, table_id)
    }

    /// Release this reference.
    ///
    /// Equivalent to dropping, but makes the intent visible at call sites
    /// that end a batch.
    pub fn release(self) {}
}

impl Drop for Connection {
    fn drop(&mut self) {
        let remaining = self.state.refcount.fetch_sub(1, Ordering::AcqRel) - 1;
        self.registry.total_references.fetch_sub(1, Ordering::AcqRel);
        if remaining == 0 {
            self.registry.sessions.remove(&self.state.session_id);
            log::debug!(
                "closed session: app={} session={}",
                self.state.app_id,
                self.state.session_id
            );
        } else {
            log::debug!(
                "released reference: app={} session={} remaining={}",
                self.state.app_id,
                self.state.session_id,
                remaining
            );
        }
    }
}
