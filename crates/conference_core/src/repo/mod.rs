//! Repository layer abstractions and SQLite implementation.
//!
//! # Responsibility
//! - Define one data-access contract per conference concern.
//! - Keep SQL and SQLite error classification inside the core boundary.
//!
//! # Invariants
//! - Write paths validate input before touching the connection.
//! - Each repository call is exactly one attempt; retry lives in the service.
//! - Parent deletes remove dependent registrations first, in one immediate
//!   transaction.
//! - Constraint failures surface as semantic errors (`DuplicateEmail`,
//!   `AlreadyRegistered`, `UnknownReference`), never as generic `Db`.

use crate::db::{DbError, Transient};
use crate::model::attendee::AttendeeId;
use crate::model::talk::TalkId;
use crate::model::validation::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendee_repo;
pub mod registration_repo;
pub mod settings_repo;
pub mod talk_repo;

pub use attendee_repo::AttendeeRepository;
pub use registration_repo::RegistrationRepository;
pub use settings_repo::SettingsRepository;
pub use talk_repo::TalkRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Typed failure of a conference store operation.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Another attendee already uses this email.
    DuplicateEmail(String),
    /// The attendee is already registered for the talk.
    AlreadyRegistered {
        attendee_id: AttendeeId,
        talk_id: TalkId,
    },
    /// Registration points at an attendee or talk that does not exist.
    UnknownReference {
        attendee_id: AttendeeId,
        talk_id: TalkId,
    },
    TalkNotFound(TalkId),
    /// The singleton settings row is absent.
    SettingsMissing,
    InvalidData(String),
}

impl RepoError {
    /// Whether this failure is busy/locked contention.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_busy())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateEmail(email) => write!(f, "email already registered: {email}"),
            Self::AlreadyRegistered {
                attendee_id,
                talk_id,
            } => write!(
                f,
                "attendee {attendee_id} is already registered for talk {talk_id}"
            ),
            Self::UnknownReference {
                attendee_id,
                talk_id,
            } => write!(
                f,
                "registration references a missing attendee {attendee_id} or talk {talk_id}"
            ),
            Self::TalkNotFound(id) => write!(f, "talk not found: {id}"),
            Self::SettingsMissing => write!(f, "conference settings row is missing"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl Transient for RepoError {
    fn is_transient(&self) -> bool {
        self.is_busy()
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rows removed by an ordered parent delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub registrations_removed: usize,
    /// `false` when the parent row did not exist.
    pub parent_removed: bool,
}

/// Every conference data-access concern, as consumed by the service.
pub trait ConferenceRepository:
    TalkRepository + AttendeeRepository + RegistrationRepository + SettingsRepository
{
}

impl<T> ConferenceRepository for T where
    T: TalkRepository + AttendeeRepository + RegistrationRepository + SettingsRepository
{
}

/// SQLite-backed conference repository borrowing one connection.
pub struct SqliteConferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteConferenceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

fn to_count(value: i64, column: &str) -> RepoResult<usize> {
    usize::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count `{value}` in {column}")))
}
