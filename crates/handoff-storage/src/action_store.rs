//! SQLite-backed shared action store.
//!
//! `take` is a single `DELETE ... RETURNING` statement, so the read and the
//! delete happen in one write transaction and no second process can observe
//! the same row.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::OptionalExtension;
use tracing::debug;

use handoff_core::error::{HandoffError, Result};
use handoff_core::store::SharedActionStore;
use handoff_core::types::{ActionKind, StoredEntry, StoredValue};

use crate::db::{sqlite_error, Database};

/// Shared action store persisted in the `pending_actions` table.
#[derive(Debug, Clone)]
pub struct SqliteActionStore {
    db: Arc<Database>,
}

impl SqliteActionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// List every pending key without consuming anything, oldest first.
    pub fn entries(&self) -> Result<Vec<StoredEntry>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT key, value, written_at FROM pending_actions
                     ORDER BY written_at ASC, key ASC",
                )
                .map_err(|e| sqlite_error("Failed to list pending actions", e))?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Value>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                })
                .map_err(|e| sqlite_error("Failed to list pending actions", e))?;

            let mut entries = Vec::new();
            for row in rows {
                let (key, value, written_at) =
                    row.map_err(|e| sqlite_error("Failed to read pending action", e))?;
                let Some(kind) = ActionKind::from_store_key(&key) else {
                    continue;
                };
                entries.push(StoredEntry {
                    kind,
                    value: from_sql_value(value),
                    written_at: millis_to_datetime(written_at),
                });
            }
            Ok(entries)
        })
    }
}

impl SharedActionStore for SqliteActionStore {
    fn write(&self, kind: ActionKind, value: StoredValue) -> Result<()> {
        let type_tag = value.type_tag();
        let value = to_sql_value(value)?;
        let written_at = Utc::now().timestamp_millis();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO pending_actions (key, value_type, value, written_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key) DO UPDATE SET
                     value_type = excluded.value_type,
                     value = excluded.value,
                     written_at = excluded.written_at",
                rusqlite::params![kind.store_key(), type_tag, value, written_at],
            )
            .map_err(|e| sqlite_error("Failed to write pending action", e))?;
            debug!(key = kind.store_key(), value_type = type_tag, "Pending action written");
            Ok(())
        })
    }

    fn peek(&self, kind: ActionKind) -> Result<Option<StoredValue>> {
        self.db.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM pending_actions WHERE key = ?1",
                    rusqlite::params![kind.store_key()],
                    |row| row.get::<_, Value>(0),
                )
                .optional()
                .map_err(|e| sqlite_error("Failed to read pending action", e))?;
            Ok(value.map(from_sql_value))
        })
    }

    fn take(&self, kind: ActionKind) -> Result<Option<StoredValue>> {
        self.db.with_conn(|conn| {
            let row = conn
                .query_row(
                    "DELETE FROM pending_actions WHERE key = ?1 RETURNING value, written_at",
                    rusqlite::params![kind.store_key()],
                    |row| Ok((row.get::<_, Value>(0)?, row.get::<_, i64>(1)?)),
                )
                .optional()
                .map_err(|e| sqlite_error("Failed to take pending action", e))?;

            match row {
                Some((value, written_at)) => {
                    let age = Utc::now() - millis_to_datetime(written_at);
                    debug!(
                        key = kind.store_key(),
                        age_ms = age.num_milliseconds(),
                        "Pending action taken"
                    );
                    Ok(Some(from_sql_value(value)))
                }
                None => Ok(None),
            }
        })
    }

    fn remove(&self, kind: ActionKind) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "DELETE FROM pending_actions WHERE key = ?1",
                rusqlite::params![kind.store_key()],
            )
            .map_err(|e| sqlite_error("Failed to remove pending action", e))?;
            Ok(())
        })
    }

    fn exists(&self, kind: ActionKind) -> Result<bool> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM pending_actions WHERE key = ?1)",
                rusqlite::params![kind.store_key()],
                |row| row.get::<_, bool>(0),
            )
            .map_err(|e| sqlite_error("Failed to check pending action", e))
        })
    }
}

fn to_sql_value(value: StoredValue) -> Result<Value> {
    match value {
        StoredValue::Blob(bytes) => Ok(Value::Blob(bytes)),
        StoredValue::Text(text) => Ok(Value::Text(text)),
        StoredValue::Flag(flag) => Ok(Value::Integer(i64::from(flag))),
        StoredValue::Unrecognized(found) => Err(HandoffError::Storage(format!(
            "Refusing to write unrecognized value ({})",
            found
        ))),
    }
}

// The storage class is authoritative; `value_type` only documents the row.
// Classes no writer produces surface as `Unrecognized` so the row is still
// taken and reported as undecodable rather than as a store failure.
fn from_sql_value(value: Value) -> StoredValue {
    match value {
        Value::Blob(bytes) => StoredValue::Blob(bytes),
        Value::Text(text) => StoredValue::Text(text),
        Value::Integer(flag) => StoredValue::Flag(flag != 0),
        Value::Real(real) => StoredValue::Unrecognized(format!("real {}", real)),
        Value::Null => StoredValue::Unrecognized("null".to_string()),
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}
