//! Orchestrator errors

use elastic_events::EventError;
use elastic_ledger::{ChainError, LedgerError, LedgerEvent};
use thiserror::Error;

/// Errors while rebuilding state from the journal
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Event store error: {0}")]
    Event(#[from] EventError),

    #[error("Journal integrity error: {0}")]
    Chain(#[from] ChainError),

    #[error("Record {sequence} must be the genesis record")]
    MissingGenesis { sequence: u64 },

    #[error("Unexpected genesis record at sequence {sequence}")]
    DuplicateGenesis { sequence: u64 },

    #[error("Genesis config rejected: {0}")]
    InvalidGenesis(LedgerError),

    #[error("Record {sequence} failed on replay: {source}")]
    Rejected { sequence: u64, source: LedgerError },

    #[error("Replay diverged at record {sequence}: journal has {recorded:?}, replay produced {replayed:?}")]
    ReplayDiverged {
        sequence: u64,
        recorded: Box<LedgerEvent>,
        replayed: Box<LedgerEvent>,
    },
}

/// Errors during commit
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Ledger not initialized (run `elastic init` first)")]
    NotInitialized,

    #[error("Ledger already initialized (sequence = {0})")]
    AlreadyInitialized(u64),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Event store error: {0}")]
    Event(#[from] EventError),
}
