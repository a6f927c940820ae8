//! Journal records - the unit of persistence
//!
//! The first record of a journal is always `Genesis`, carrying the config
//! the ledger was built from. Every later record holds one committed
//! command together with the event it produced.

use crate::command::LedgerCommand;
use crate::config::LedgerConfig;
use crate::event::LedgerEvent;
use crate::hash::calculate_record_hash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `prev_hash` of the first record in a chain
pub const GENESIS_PREV_HASH: &str = "GENESIS";

/// Payload of a journal record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordEntry {
    /// Ledger construction and the initial mint
    Genesis {
        config: LedgerConfig,
        event: LedgerEvent,
    },

    /// A committed command and the event it emitted
    Command {
        command: LedgerCommand,
        event: LedgerEvent,
    },
}

impl RecordEntry {
    pub fn event(&self) -> &LedgerEvent {
        match self {
            RecordEntry::Genesis { event, .. } | RecordEntry::Command { event, .. } => event,
        }
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, RecordEntry::Genesis { .. })
    }
}

/// A hash-chained journal record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Sequence number, starting at 1
    pub sequence: u64,

    /// Hash of the previous record (`GENESIS` for the first)
    pub prev_hash: String,

    /// SHA256 over every other field
    pub hash: String,

    pub timestamp: DateTime<Utc>,

    /// Correlation ID for tracing
    pub correlation_id: String,

    pub entry: RecordEntry,
}

impl JournalRecord {
    /// Build a record and compute its hash
    pub fn seal(
        sequence: u64,
        prev_hash: impl Into<String>,
        correlation_id: impl Into<String>,
        entry: RecordEntry,
    ) -> Self {
        let mut record = Self {
            sequence,
            prev_hash: prev_hash.into(),
            hash: String::new(),
            timestamp: Utc::now(),
            correlation_id: correlation_id.into(),
            entry,
        };
        record.hash = calculate_record_hash(&record);
        record
    }

    pub fn event(&self) -> &LedgerEvent {
        self.entry.event()
    }
}
