//! Registration repository contract and SQLite implementation.
//!
//! # Invariants
//! - One row per `(attendee_id, talk_id)`; a second insert is
//!   `AlreadyRegistered`, not a generic failure.
//! - Rows referencing a missing attendee or talk are rejected as
//!   `UnknownReference` (requires `foreign_keys=ON`).

use super::attendee_repo::parse_attendee_row;
use super::talk_repo::parse_talk_row;
use super::{RepoError, RepoResult, SqliteConferenceRepository};
use crate::db::DbError;
use crate::model::attendee::{Attendee, AttendeeId, RegistrationId};
use crate::model::talk::{Talk, TalkId};
use rusqlite::params;

/// Repository interface for attendee/talk registrations.
pub trait RegistrationRepository {
    fn register(&self, attendee_id: AttendeeId, talk_id: TalkId) -> RepoResult<RegistrationId>;
    /// Returns whether a registration row was removed.
    fn unregister(&self, attendee_id: AttendeeId, talk_id: TalkId) -> RepoResult<bool>;
    fn list_talk_registrants(&self, talk_id: TalkId) -> RepoResult<Vec<Attendee>>;
    /// Talks the attendee registered for, ordered by start time.
    fn list_attendee_talks(&self, attendee_id: AttendeeId) -> RepoResult<Vec<Talk>>;
}

impl RegistrationRepository for SqliteConferenceRepository<'_> {
    fn register(&self, attendee_id: AttendeeId, talk_id: TalkId) -> RepoResult<RegistrationId> {
        let inserted = self.conn.execute(
            "INSERT INTO registrations (attendee_id, talk_id) VALUES (?1, ?2);",
            params![attendee_id, talk_id],
        );
        if let Err(err) = inserted {
            let err = DbError::from(err);
            if err.is_unique_violation() {
                return Err(RepoError::AlreadyRegistered {
                    attendee_id,
                    talk_id,
                });
            }
            if err.is_foreign_key_violation() {
                return Err(RepoError::UnknownReference {
                    attendee_id,
                    talk_id,
                });
            }
            return Err(err.into());
        }

        Ok(self.conn.last_insert_rowid())
    }

    fn unregister(&self, attendee_id: AttendeeId, talk_id: TalkId) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM registrations WHERE attendee_id = ?1 AND talk_id = ?2;",
            params![attendee_id, talk_id],
        )?;
        Ok(removed > 0)
    }

    fn list_talk_registrants(&self, talk_id: TalkId) -> RepoResult<Vec<Attendee>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.name, a.email, a.created_at
             FROM attendees a
             JOIN registrations r ON r.attendee_id = a.id
             WHERE r.talk_id = ?1
             ORDER BY r.id ASC;",
        )?;
        let attendees = stmt
            .query_map([talk_id], parse_attendee_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(attendees)
    }

    fn list_attendee_talks(&self, attendee_id: AttendeeId) -> RepoResult<Vec<Talk>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                t.id,
                t.title,
                t.speaker,
                t.description,
                t.start_time,
                t.end_time,
                t.room,
                t.created_at
             FROM talks t
             JOIN registrations r ON r.talk_id = t.id
             WHERE r.attendee_id = ?1
             ORDER BY t.start_time ASC, t.id ASC;",
        )?;
        let talks = stmt
            .query_map([attendee_id], parse_talk_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(talks)
    }
}
