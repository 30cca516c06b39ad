//! Attendee repository contract and SQLite implementation.
//!
//! # Invariants
//! - Duplicate emails surface as `RepoError::DuplicateEmail`.
//! - `delete_attendee` removes registrations before the attendee, atomically.

use super::{to_count, DeleteOutcome, RepoError, RepoResult, SqliteConferenceRepository};
use crate::db::DbError;
use crate::model::attendee::{Attendee, AttendeeDraft, AttendeeId, AttendeeSummary};
use rusqlite::{params, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Repository interface for attendee persistence.
pub trait AttendeeRepository {
    fn create_attendee(&self, draft: &AttendeeDraft) -> RepoResult<AttendeeId>;
    /// Deletes the attendee's registrations, then the attendee.
    fn delete_attendee(&self, id: AttendeeId) -> RepoResult<DeleteOutcome>;
    fn get_attendee(&self, id: AttendeeId) -> RepoResult<Option<Attendee>>;
    /// Lists attendees newest first with their registration counts.
    fn list_attendees(&self) -> RepoResult<Vec<AttendeeSummary>>;
}

impl AttendeeRepository for SqliteConferenceRepository<'_> {
    fn create_attendee(&self, draft: &AttendeeDraft) -> RepoResult<AttendeeId> {
        draft.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO attendees (name, email) VALUES (?1, ?2);",
            params![draft.name, draft.email],
        );
        if let Err(err) = inserted {
            let err = DbError::from(err);
            if err.is_unique_violation() {
                return Err(RepoError::DuplicateEmail(draft.email.clone()));
            }
            return Err(err.into());
        }

        Ok(self.conn.last_insert_rowid())
    }

    fn delete_attendee(&self, id: AttendeeId) -> RepoResult<DeleteOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let registrations_removed =
            tx.execute("DELETE FROM registrations WHERE attendee_id = ?1;", [id])?;
        let attendees_removed = tx.execute("DELETE FROM attendees WHERE id = ?1;", [id])?;
        tx.commit()?;

        Ok(DeleteOutcome {
            registrations_removed,
            parent_removed: attendees_removed > 0,
        })
    }

    fn get_attendee(&self, id: AttendeeId) -> RepoResult<Option<Attendee>> {
        let attendee = self
            .conn
            .query_row(
                "SELECT id, name, email, created_at FROM attendees WHERE id = ?1;",
                [id],
                parse_attendee_row,
            )
            .optional()?;
        Ok(attendee)
    }

    fn list_attendees(&self) -> RepoResult<Vec<AttendeeSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                a.id,
                a.name,
                a.email,
                a.created_at,
                COUNT(r.talk_id) AS registered_talks_count
             FROM attendees a
             LEFT JOIN registrations r ON r.attendee_id = a.id
             GROUP BY a.id
             ORDER BY a.created_at DESC, a.id DESC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut attendees = Vec::new();

        while let Some(row) = rows.next()? {
            let count: i64 = row.get("registered_talks_count")?;
            attendees.push(AttendeeSummary {
                attendee: parse_attendee_row(row)?,
                registered_talks_count: to_count(count, "registered_talks_count")?,
            });
        }

        Ok(attendees)
    }
}

pub(super) fn parse_attendee_row(row: &Row<'_>) -> rusqlite::Result<Attendee> {
    Ok(Attendee {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
    })
}
