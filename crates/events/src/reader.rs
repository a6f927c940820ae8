//! JSONL journal reader - sequential reader for replay

use crate::error::EventError;
use elastic_ledger::JournalRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Sequential journal reader for replay
pub struct EventReader {
    files: Vec<PathBuf>,
}

impl EventReader {
    /// Create a reader over every `.jsonl` file in a directory.
    /// A missing directory reads as an empty journal.
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, EventError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let file_path = entry?.path();
                if file_path.extension().is_some_and(|ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        // File names are dates, so lexical order is chronological
        files.sort();

        Ok(Self { files })
    }

    /// Journal files in replay order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Read all records from all files in order
    pub fn read_all(&self) -> Result<Vec<JournalRecord>, EventError> {
        let mut records = Vec::new();
        for file_path in &self.files {
            read_file(file_path, &mut records)?;
        }
        Ok(records)
    }

    /// The last record on disk (for prev_hash and sequence)
    pub fn last_record(&self) -> Result<Option<JournalRecord>, EventError> {
        // Only the newest non-empty file matters
        for file_path in self.files.iter().rev() {
            let mut records = Vec::new();
            read_file(file_path, &mut records)?;
            if let Some(last) = records.pop() {
                return Ok(Some(last));
            }
        }
        Ok(None)
    }

    /// Count total records across all files
    pub fn count(&self) -> Result<usize, EventError> {
        let mut count = 0;
        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);
            for line in reader.lines() {
                if !line?.trim().is_empty() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}

fn read_file(path: &Path, records: &mut Vec<JournalRecord>) -> Result<(), EventError> {
    let reader = BufReader::new(File::open(path)?);

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| EventError::CorruptRecord {
            path: path.to_path_buf(),
            line: n + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(())
}
