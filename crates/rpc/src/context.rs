//! Application context - journal, replay and the live ledger

use crate::error::{CommitError, ReplayError};
use elastic_events::{EventReader, EventStore};
use elastic_ledger::{
    verify_chain, JournalRecord, LedgerCommand, LedgerConfig, RecordEntry, ScaledLedger,
    GENESIS_PREV_HASH,
};
use std::path::{Path, PathBuf};

/// Application context - wires the journal to the in-memory ledger
pub struct AppContext {
    ledger: Option<ScaledLedger>,
    event_store: EventStore,
    journal_path: PathBuf,
    last_sequence: u64,
    last_hash: String,
}

impl AppContext {
    /// Open the data directory and rebuild state from the journal
    pub fn new(data_path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let journal_path = Self::journal_dir(data_path);
        std::fs::create_dir_all(&journal_path).map_err(elastic_events::EventError::from)?;

        let records = EventReader::from_directory(&journal_path)?.read_all()?;
        verify_chain(&records)?;
        let ledger = replay(&records)?;

        let (last_sequence, last_hash) = match records.last() {
            Some(last) => (last.sequence, last.hash.clone()),
            None => (0, GENESIS_PREV_HASH.to_string()),
        };

        tracing::info!(records = records.len(), "Journal replayed");

        let event_store = EventStore::new(&journal_path)?;

        Ok(Self {
            ledger,
            event_store,
            journal_path,
            last_sequence,
            last_hash,
        })
    }

    /// Create the ledger and write the genesis record
    pub fn init(
        &mut self,
        config: LedgerConfig,
        correlation_id: &str,
    ) -> Result<JournalRecord, CommitError> {
        if self.is_initialized() {
            return Err(CommitError::AlreadyInitialized(self.last_sequence));
        }

        let ledger = ScaledLedger::from_config(&config)?;
        let entry = RecordEntry::Genesis {
            event: ledger.mint_event(),
            config,
        };
        let record = self.append(entry, correlation_id)?;
        self.ledger = Some(ledger);
        Ok(record)
    }

    /// Commit a command
    ///
    /// Flow: execute on a staged copy → append → swap in. A rejected
    /// command, or a failed append, leaves both journal and ledger as they
    /// were.
    pub fn commit(
        &mut self,
        command: LedgerCommand,
        correlation_id: &str,
    ) -> Result<JournalRecord, CommitError> {
        let mut staged = self.ledger()?.clone();
        let event = staged.execute(&command)?;

        let record = self.append(RecordEntry::Command { command, event }, correlation_id)?;
        self.ledger = Some(staged);

        tracing::debug!(sequence = record.sequence, event = record.event().name(), "Committed");
        Ok(record)
    }

    fn append(
        &mut self,
        entry: RecordEntry,
        correlation_id: &str,
    ) -> Result<JournalRecord, CommitError> {
        let record = JournalRecord::seal(
            self.last_sequence + 1,
            self.last_hash.clone(),
            correlation_id,
            entry,
        );
        self.event_store.append(&record)?;

        self.last_sequence = record.sequence;
        self.last_hash = record.hash.clone();
        Ok(record)
    }

    /// The live ledger
    pub fn ledger(&self) -> Result<&ScaledLedger, CommitError> {
        self.ledger.as_ref().ok_or(CommitError::NotInitialized)
    }

    /// All records on disk, in order
    pub fn records(&self) -> Result<Vec<JournalRecord>, elastic_events::EventError> {
        EventReader::from_directory(&self.journal_path)?.read_all()
    }

    /// Journal directory under a data directory
    pub fn journal_dir(data_path: impl AsRef<Path>) -> PathBuf {
        data_path.as_ref().join("journal")
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Check if the genesis record exists
    pub fn is_initialized(&self) -> bool {
        self.ledger.is_some()
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }
}

/// Rebuild a ledger from a verified record sequence.
///
/// Returns `None` for an empty journal.
pub fn replay(records: &[JournalRecord]) -> Result<Option<ScaledLedger>, ReplayError> {
    let mut iter = records.iter();

    let mut ledger = match iter.next() {
        None => return Ok(None),
        Some(record) => match &record.entry {
            RecordEntry::Genesis { config, event } => {
                let ledger =
                    ScaledLedger::from_config(config).map_err(ReplayError::InvalidGenesis)?;
                let replayed = ledger.mint_event();
                if &replayed != event {
                    return Err(ReplayError::ReplayDiverged {
                        sequence: record.sequence,
                        recorded: Box::new(event.clone()),
                        replayed: Box::new(replayed),
                    });
                }
                ledger
            }
            RecordEntry::Command { .. } => {
                return Err(ReplayError::MissingGenesis {
                    sequence: record.sequence,
                })
            }
        },
    };

    for record in iter {
        let (command, recorded) = match &record.entry {
            RecordEntry::Command { command, event } => (command, event),
            RecordEntry::Genesis { .. } => {
                return Err(ReplayError::DuplicateGenesis {
                    sequence: record.sequence,
                })
            }
        };

        let replayed = ledger
            .execute(command)
            .map_err(|source| ReplayError::Rejected {
                sequence: record.sequence,
                source,
            })?;

        if &replayed != recorded {
            return Err(ReplayError::ReplayDiverged {
                sequence: record.sequence,
                recorded: Box::new(recorded.clone()),
                replayed: Box::new(replayed),
            });
        }
    }

    Ok(Some(ledger))
}
