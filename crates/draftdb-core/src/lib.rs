//! # draftdb-core
//!
//! The DraftDB checkpoint resolution core:
//!
//! - [`connection`]: reference-counted connection handles to per-app
//!   databases, with discard-and-reconnect on failure
//! - [`resolver`]: the two checkpoint collapse operations (keep newest /
//!   revert to oldest)
//! - [`enumerator`]: loading the set of rows with pending checkpoints
//! - [`batch`]: the bulk resolution driver with per-row error recovery
//!
//! Callers (a list UI, a CLI) drive the core through three calls: enumerate
//! pending rows, resolve them all one way or the other, re-enumerate to
//! confirm the table is clean.

pub mod batch;
pub mod connection;
pub mod enumerator;
pub mod error;
pub mod resolver;

pub use batch::{BatchOutcome, BatchResolver, ResolvePolicy, RowFailure};
pub use connection::{Connection, ConnectionFactory};
pub use enumerator::{list_pending_rows, load_pending_rows, RowDisposition};
pub use error::{ConnectionError, EnumerationError, ResolveError, SingleRowError};
pub use resolver::{resolve_as_newest, resolve_as_oldest};
