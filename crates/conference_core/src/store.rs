//! Explicitly owned store handle.
//!
//! # Responsibility
//! - Own one configured SQLite connection for a process or worker.
//! - Hand out services bound to that connection and its retry policy.
//!
//! # Invariants
//! - There is no process-global connection; callers construct and pass a
//!   `ConferenceStore` from their composition root.
//! - Each handle is used from one thread; concurrent workers open their own
//!   handle on the same file.

use crate::db::{open_db, open_db_in_memory, DbResult, StoreOptions};
use crate::repo::SqliteConferenceRepository;
use crate::service::conference_service::ConferenceService;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub struct ConferenceStore {
    conn: Connection,
    options: StoreOptions,
    path: Option<PathBuf>,
}

impl ConferenceStore {
    /// Opens (and on first use initializes) the store file at `path`.
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = open_db(path, &options)?;
        Ok(Self {
            conn,
            options,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory(options: StoreOptions) -> DbResult<Self> {
        let conn = open_db_in_memory(&options)?;
        Ok(Self {
            conn,
            options,
            path: None,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Domain operations bound to this handle's connection.
    pub fn service(&self) -> ConferenceService<SqliteConferenceRepository<'_>> {
        ConferenceService::with_retry_policy(
            SqliteConferenceRepository::new(&self.conn),
            self.options.retry,
        )
    }
}
