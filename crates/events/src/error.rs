//! Journal store errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record in {}:{line}: {source}", path.display())]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Out-of-order append: expected sequence {expected}, got {actual}")]
    OutOfOrder { expected: u64, actual: u64 },
}
