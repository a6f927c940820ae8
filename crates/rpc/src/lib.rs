//! Elastic RPC - CLI orchestrator
//!
//! This crate provides the CLI binary, journal replay and the commit flow
//! that keeps the journal and the in-memory ledger in step.

pub mod commands;
pub mod context;
pub mod error;

pub use context::AppContext;
pub use error::{CommitError, ReplayError};
