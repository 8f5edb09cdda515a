//! DraftDB command-line tool library.
//!
//! The binary in `main.rs` stays a thin orchestrator; configuration,
//! bootstrap, and the command implementations live here.

pub mod commands;
pub mod config;
pub mod lifecycle;
