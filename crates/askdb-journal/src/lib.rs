//! # askdb-journal
//!
//! File-based append-only query journal for askdb.
//!
//! Every request is recorded as a [`types::QueryRecord`] line in
//! `query_log.jsonl`; failures are mirrored into `error_log.jsonl`; running
//! [`types::JournalStats`] live in `stats.json`. The journal is consumed by
//! the orchestrator after each request and queried by the CLI's `logs`,
//! `recent`, and `errors` commands.

#![deny(unsafe_code)]

pub mod errors;
pub mod journal;
pub mod types;

pub use errors::{JournalError, Result};
pub use journal::QueryJournal;
pub use types::{ErrorRecord, JournalStats, QueryRecord};
