//! SQLite storage bootstrap, schema setup and write-retry entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for concurrent multi-process use.
//! - Ensure the conference schema exists and seed first-run data.
//! - Classify SQLite failures (busy/locked, uniqueness, foreign key).
//!
//! # Invariants
//! - Core code must not read/write application data before schema setup
//!   succeeds.
//! - PRAGMA failures degrade concurrency but never abort startup.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod open;
pub mod retry;
pub mod schema;
pub mod seed;

pub use open::{open_db, open_db_in_memory, StoreOptions};
pub use retry::{RetryPolicy, Transient};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    CreateDir { path: PathBuf, source: io::Error },
}

impl DbError {
    /// Returns the SQLite primary error code, if this is an engine failure.
    pub fn sqlite_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Sqlite(err) => err.sqlite_error_code(),
            Self::CreateDir { .. } => None,
        }
    }

    /// Returns the SQLite extended result code, if this is an engine failure.
    pub fn extended_code(&self) -> Option<i32> {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => Some(err.extended_code),
            _ => None,
        }
    }

    /// Whether the store reported that another writer holds the lock.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.sqlite_code(),
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
        )
    }

    pub fn is_unique_violation(&self) -> bool {
        self.extended_code() == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.extended_code() == Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::CreateDir { path, source } => write!(
                f,
                "failed to create database directory `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
