//! Elastic Ledger - Share/index accounting core
//!
//! This is the HEART of Elastic. Balances are stored as shares and scaled by
//! a global index on the way out, so a rebase is a single index update no
//! matter how many accounts exist.
//!
//! # Key Types
//! - `ScaledLedger`: The ledger state machine
//! - `LedgerCommand`: Serializable form of every mutating operation
//! - `LedgerEvent`: Transfer / Approval / Rebase / AdminTransferred
//! - `Authorizer`: Pluggable capability check for privileged operations
//! - `SharedLedger`: Serialized (single-writer) access across threads
//! - `JournalRecord`: Hash-chained record of a committed command

pub mod auth;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod hash;
pub mod invariants;
pub mod ledger;
pub mod record;
pub mod shared;

pub use auth::{AdminAction, AdminSet, Authorizer, SingleAdmin};
pub use command::{CommandKind, LedgerCommand};
pub use config::{LedgerConfig, TokenMetadata};
pub use error::LedgerError;
pub use event::LedgerEvent;
pub use hash::{calculate_record_hash, verify_chain, ChainError};
pub use invariants::{check_invariants, InvariantReport, InvariantViolation};
pub use ledger::ScaledLedger;
pub use record::{JournalRecord, RecordEntry, GENESIS_PREV_HASH};
pub use shared::{AccountBalance, LedgerSnapshot, SharedLedger};
