//! Idempotent conference schema setup.
//!
//! # Invariants
//! - Every statement is `CREATE ... IF NOT EXISTS`; re-running is a no-op.
//! - `conference_settings` admits only `id = 1`.
//! - `registrations` holds at most one row per `(attendee_id, talk_id)`.

use super::DbResult;
use rusqlite::{Connection, Transaction, TransactionBehavior};

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables the conference store requires, in dependency order.
pub const REQUIRED_TABLES: &[&str] = &[
    "talks",
    "attendees",
    "registrations",
    "conference_settings",
];

/// Creates all conference tables that do not exist yet.
///
/// Runs under an immediate transaction so concurrently starting instances
/// wait on the write lock instead of racing a read-to-write upgrade.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.commit()?;
    Ok(())
}
