//! Database connection management.
//!
//! Wraps a single rusqlite Connection in a Mutex. Each process opens its own
//! `Database` on the shared file; WAL mode plus a busy timeout lets the agent
//! and the application write to it concurrently.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{Connection, ErrorCode};
use tracing::info;

use handoff_core::error::HandoffError;

use crate::migrations;

/// Busy timeout used when the caller does not configure one.
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;

/// Thread-safe SQLite database wrapper.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database at the given path.
    ///
    /// Configures WAL mode, synchronous=NORMAL, the busy timeout, and runs all
    /// pending migrations. Failure to open the file is reported as
    /// [`HandoffError::StoreUnavailable`].
    pub fn new(path: &Path, busy_timeout_ms: u32) -> Result<Self, HandoffError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| {
            HandoffError::StoreUnavailable(format!("Failed to open database: {}", e))
        })?;

        conn.busy_timeout(Duration::from_millis(u64::from(busy_timeout_ms)))
            .map_err(|e| sqlite_error("Failed to set busy timeout", e))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| sqlite_error("Failed to set pragmas", e))?;

        info!("Database opened at {}", path.display());

        let db = Self {
            conn: Mutex::new(conn),
        };

        db.with_conn(migrations::run_migrations)?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, HandoffError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            HandoffError::StoreUnavailable(format!("Failed to open in-memory db: {}", e))
        })?;

        let db = Self {
            conn: Mutex::new(conn),
        };

        db.with_conn(migrations::run_migrations)?;

        Ok(db)
    }

    /// Execute a closure with a reference to the underlying connection.
    ///
    /// The mutex is held for the duration of the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, HandoffError>
    where
        F: FnOnce(&Connection) -> Result<T, HandoffError>,
    {
        let conn = self.conn.lock().map_err(|e| {
            HandoffError::StoreUnavailable(format!("Database lock poisoned: {}", e))
        })?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

/// Map a rusqlite error, classifying lock contention and unreadable files as
/// an unavailable store rather than a statement failure.
pub(crate) fn sqlite_error(context: &str, err: rusqlite::Error) -> HandoffError {
    let unavailable = matches!(
        err.sqlite_error_code(),
        Some(
            ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::SystemIoFailure
        )
    );
    if unavailable {
        HandoffError::StoreUnavailable(format!("{}: {}", context, err))
    } else {
        HandoffError::Storage(format!("{}: {}", context, err))
    }
}
