//! Database schema migrations.

use rusqlite::Connection;
use tracing::info;

use handoff_core::error::HandoffError;

use crate::db::sqlite_error;

/// Run all pending database migrations.
///
/// Safe to call from both processes on every open; each version is applied
/// inside an immediate transaction so only one of them wins.
pub fn run_migrations(conn: &Connection) -> Result<(), HandoffError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| sqlite_error("Failed to create migrations table", e))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| sqlite_error("Failed to query migration version", e))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: pending_actions");
    }

    Ok(())
}

/// Version 1: one row per pending action key.
fn apply_v1(conn: &Connection) -> Result<(), HandoffError> {
    conn.execute_batch(
        "
        BEGIN IMMEDIATE;

        CREATE TABLE IF NOT EXISTS pending_actions (
            key         TEXT PRIMARY KEY NOT NULL
                        CHECK (key IN ('pending-order', 'pending-search',
                                       'pending-reorder', 'pending-check-status')),
            value_type  TEXT NOT NULL
                        CHECK (value_type IN ('blob', 'text', 'flag')),
            value       BLOB NOT NULL,
            written_at  INTEGER NOT NULL
        );

        INSERT OR IGNORE INTO schema_migrations (version, name)
            VALUES (1, 'pending_actions');

        COMMIT;
        ",
    )
    .map_err(|e| sqlite_error("Failed to apply migration v1", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO pending_actions (key, value_type, value, written_at)
             VALUES ('pending-refund', 'flag', 1, 0)",
            [],
        );
        assert!(result.is_err());
    }
}
