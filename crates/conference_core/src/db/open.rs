//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure the pragmas that let several instances share one file.
//! - Ensure schema and first-run seed data before returning a connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - Returned connections have the schema fully created.
//! - Pragma failures are logged as degraded, never returned.

use super::retry::RetryPolicy;
use super::schema::ensure_schema;
use super::seed::seed_if_empty;
use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Store-level tuning shared by every connection a process opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// How long one statement waits on a held lock before reporting busy.
    pub busy_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Opens the conference database file, creating its directory if needed.
///
/// # Side effects
/// - Creates missing parent directories.
/// - Creates missing tables and seeds an empty store.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, options: &StoreOptions) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode=file path={}",
        path.display()
    );

    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if let Err(source) = std::fs::create_dir_all(parent) {
            let err = DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            };
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_dir_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    }

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, options, "file", started_at)
}

/// Opens an in-memory conference database.
///
/// WAL is unavailable for memory databases, so this path always logs a
/// degraded journal mode.
pub fn open_db_in_memory(options: &StoreOptions) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, options, "memory", started_at)
}

fn finish_open(
    conn: Connection,
    options: &StoreOptions,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    match bootstrap_connection(&conn, options) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection, options: &StoreOptions) -> DbResult<()> {
    configure_pragmas(conn, options);
    options.retry.run("ensure_schema", || ensure_schema(conn))?;
    options.retry.run("seed", || seed_if_empty(conn))?;
    Ok(())
}

fn configure_pragmas(conn: &Connection, options: &StoreOptions) {
    if let Err(err) = conn.busy_timeout(options.busy_timeout) {
        warn_degraded("busy_timeout", &err);
    }

    match conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get::<_, String>(0)) {
        Ok(mode) if mode.eq_ignore_ascii_case("wal") => {
            info!("event=db_pragma module=db status=ok pragma=journal_mode value=wal");
        }
        Ok(mode) => {
            warn!(
                "event=db_pragma module=db status=degraded pragma=journal_mode value={}",
                mode
            );
        }
        Err(err) => warn_degraded("journal_mode", &err),
    }

    if let Err(err) = conn.pragma_update(None, "synchronous", "NORMAL") {
        warn_degraded("synchronous", &err);
    }

    if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
        warn_degraded("foreign_keys", &err);
    }
}

fn warn_degraded(pragma: &str, err: &rusqlite::Error) {
    warn!(
        "event=db_pragma module=db status=degraded pragma={} error={}",
        pragma, err
    );
}
