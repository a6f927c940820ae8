//! Elastic Events - JSONL journal store
//!
//! Committed ledger commands are persisted as hash-chained records, one JSON
//! object per line, in date-rotated `.jsonl` files. The journal is the
//! source of truth: ledger state is rebuilt by replaying it.

pub mod error;
pub mod reader;
pub mod store;

pub use error::EventError;
pub use reader::EventReader;
pub use store::EventStore;
