//! Append-only journal files and running statistics.
//!
//! Three files live in the journal directory:
//!
//! - `query_log.jsonl` — one [`QueryRecord`] per line, append-only
//! - `error_log.jsonl` — failed requests mirrored as [`ErrorRecord`]s
//! - `stats.json` — running [`JournalStats`], rewritten per request
//!
//! Appends are serialized by a lock so interleaved requests cannot tear
//! lines. Readers skip corrupt lines instead of failing.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;

use crate::errors::Result;
use crate::types::{ErrorRecord, JournalStats, QueryRecord};

/// File-backed query journal.
pub struct QueryJournal {
    query_log: PathBuf,
    error_log: PathBuf,
    stats_file: PathBuf,
    write_lock: Mutex<()>,
}

impl QueryJournal {
    /// Open (and initialize) a journal in the given directory.
    ///
    /// Creates the directory and a fresh `stats.json` when missing.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let journal = Self {
            query_log: dir.join("query_log.jsonl"),
            error_log: dir.join("error_log.jsonl"),
            stats_file: dir.join("stats.json"),
            write_lock: Mutex::new(()),
        };
        if !journal.stats_file.exists() {
            journal.save_stats(&JournalStats::default())?;
        }
        Ok(journal)
    }

    /// Append a request record, update stats, and mirror failures to the
    /// error log.
    pub fn log_query(&self, record: &QueryRecord) -> Result<()> {
        let _guard = self.write_lock.lock();

        append_line(&self.query_log, record)?;

        let mut stats = self.load_stats();
        stats.total_queries += 1;
        stats.last_query_time = Some(record.timestamp.clone());
        if record.success {
            stats.successful_queries += 1;
        } else {
            stats.failed_queries += 1;
        }
        stats.total_statements += record.statement_count() as u64;
        self.save_stats(&stats)?;

        if !record.success {
            append_line(&self.error_log, &ErrorRecord::from(record))?;
        }
        Ok(())
    }

    /// Running statistics with the success rate computed.
    pub fn get_stats(&self) -> JournalStats {
        let mut stats = self.load_stats();
        stats.recompute_rate();
        stats
    }

    /// The `n` most recent request records, newest first.
    pub fn get_recent(&self, n: usize) -> Vec<QueryRecord> {
        read_tail(&self.query_log, n)
    }

    /// The `n` most recent error records, newest first.
    pub fn get_errors(&self, n: usize) -> Vec<ErrorRecord> {
        read_tail(&self.error_log, n)
    }

    /// Delete all log files and reset statistics.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        for path in [&self.query_log, &self.error_log] {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        self.save_stats(&JournalStats::default())
    }

    fn load_stats(&self) -> JournalStats {
        std::fs::read_to_string(&self.stats_file)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn save_stats(&self, stats: &JournalStats) -> Result<()> {
        let content = serde_json::to_string_pretty(stats)?;
        std::fs::write(&self.stats_file, content)?;
        Ok(())
    }
}

fn append_line<T: serde::Serialize>(path: &Path, record: &T) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(record)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Read the last `n` valid JSONL records, newest first. Corrupt lines are
/// skipped with a warning.
fn read_tail<T: DeserializeOwned>(path: &Path, n: usize) -> Vec<T> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut records: Vec<T> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping corrupt journal line");
                None
            }
        })
        .collect();
    let keep_from = records.len().saturating_sub(n);
    let _ = records.drain(..keep_from);
    records.reverse();
    records
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
