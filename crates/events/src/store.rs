//! JSONL journal store - append-only writer

use crate::error::EventError;
use crate::reader::EventReader;
use elastic_ledger::JournalRecord;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only JSONL journal store
pub struct EventStore {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
    /// Sequence of the last record on disk
    last_sequence: u64,
}

impl EventStore {
    /// Open (or create) a store at the given path
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, EventError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        let last_sequence = EventReader::from_directory(&base_path)?
            .last_record()?
            .map_or(0, |record| record.sequence);

        tracing::debug!(path = %base_path.display(), last_sequence, "Journal store opened");

        Ok(Self {
            base_path,
            current_file: None,
            current_date: None,
            last_sequence,
        })
    }

    /// Append a record. Sequences must follow on from the last record.
    pub fn append(&mut self, record: &JournalRecord) -> Result<(), EventError> {
        let expected = self.last_sequence + 1;
        if record.sequence != expected {
            return Err(EventError::OutOfOrder {
                expected,
                actual: record.sequence,
            });
        }

        let date = record.timestamp.format("%Y-%m-%d").to_string();
        if self.current_date.as_deref() != Some(date.as_str()) {
            self.rotate_file(&date)?;
        }

        if let Some(ref mut writer) = self.current_file {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        self.last_sequence = record.sequence;
        Ok(())
    }

    /// Sequence of the last appended record (0 when empty)
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    fn rotate_file(&mut self, date: &str) -> Result<(), EventError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        tracing::debug!(file = %file_path.display(), "Journal file rotated");

        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());
        Ok(())
    }

    /// List all JSONL files in the store
    pub fn list_files(&self) -> Result<Vec<PathBuf>, EventError> {
        Ok(EventReader::from_directory(&self.base_path)?.files().to_vec())
    }

    /// Flush and close the current file
    pub fn close(&mut self) -> Result<(), EventError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }
}

impl Drop for EventStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
