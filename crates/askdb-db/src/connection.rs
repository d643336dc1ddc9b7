//! `SQLite` connection setup.
//!
//! The engine holds exactly one connection for the life of the process and
//! reuses it sequentially, with no pooling. The pragmas here (WAL, busy timeout)
//! keep a long-lived single connection well-behaved next to other readers of
//! the same file.

use rusqlite::Connection;

use crate::errors::Result;

/// Busy timeout applied to file-backed connections.
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Open a file-backed connection with pragmas applied.
pub fn open_file(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(&format!(
        "PRAGMA journal_mode = WAL;\
         PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};\
         PRAGMA foreign_keys = ON;"
    ))?;
    Ok(conn)
}

/// Open an in-memory connection (for testing).
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
