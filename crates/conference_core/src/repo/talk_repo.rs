//! Talk repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listings are ordered by `start_time ASC`, ties by insertion order.
//! - `delete_talk` removes registrations before the talk, atomically.

use super::{DeleteOutcome, RepoError, RepoResult, SqliteConferenceRepository};
use crate::model::talk::{Talk, TalkDraft, TalkId, TalkWithAttendees};
use rusqlite::{params, OptionalExtension, Row, Transaction, TransactionBehavior};

const TALK_SELECT_SQL: &str = "SELECT
    id,
    title,
    speaker,
    description,
    start_time,
    end_time,
    room,
    created_at
FROM talks";

/// Repository interface for talk persistence.
pub trait TalkRepository {
    fn create_talk(&self, draft: &TalkDraft) -> RepoResult<TalkId>;
    fn update_talk(&self, id: TalkId, draft: &TalkDraft) -> RepoResult<()>;
    /// Deletes the talk's registrations, then the talk.
    fn delete_talk(&self, id: TalkId) -> RepoResult<DeleteOutcome>;
    fn get_talk(&self, id: TalkId) -> RepoResult<Option<Talk>>;
    fn list_talks(&self) -> RepoResult<Vec<Talk>>;
    fn list_talks_with_attendees(&self) -> RepoResult<Vec<TalkWithAttendees>>;
}

impl TalkRepository for SqliteConferenceRepository<'_> {
    fn create_talk(&self, draft: &TalkDraft) -> RepoResult<TalkId> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO talks (title, speaker, description, start_time, end_time, room)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                draft.title,
                draft.speaker,
                draft.description,
                draft.start_time,
                draft.end_time,
                draft.room,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_talk(&self, id: TalkId, draft: &TalkDraft) -> RepoResult<()> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE talks
             SET
                title = ?1,
                speaker = ?2,
                description = ?3,
                start_time = ?4,
                end_time = ?5,
                room = ?6
             WHERE id = ?7;",
            params![
                draft.title,
                draft.speaker,
                draft.description,
                draft.start_time,
                draft.end_time,
                draft.room,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TalkNotFound(id));
        }

        Ok(())
    }

    fn delete_talk(&self, id: TalkId) -> RepoResult<DeleteOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let registrations_removed =
            tx.execute("DELETE FROM registrations WHERE talk_id = ?1;", [id])?;
        let talks_removed = tx.execute("DELETE FROM talks WHERE id = ?1;", [id])?;
        tx.commit()?;

        Ok(DeleteOutcome {
            registrations_removed,
            parent_removed: talks_removed > 0,
        })
    }

    fn get_talk(&self, id: TalkId) -> RepoResult<Option<Talk>> {
        let talk = self
            .conn
            .query_row(
                &format!("{TALK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_talk_row,
            )
            .optional()?;
        Ok(talk)
    }

    fn list_talks(&self) -> RepoResult<Vec<Talk>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TALK_SELECT_SQL} ORDER BY start_time ASC, id ASC;"))?;
        let talks = stmt
            .query_map([], parse_talk_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(talks)
    }

    fn list_talks_with_attendees(&self) -> RepoResult<Vec<TalkWithAttendees>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                t.id,
                t.title,
                t.speaker,
                t.description,
                t.start_time,
                t.end_time,
                t.room,
                t.created_at,
                a.name AS attendee_name
             FROM talks t
             LEFT JOIN registrations r ON r.talk_id = t.id
             LEFT JOIN attendees a ON a.id = r.attendee_id
             ORDER BY t.start_time ASC, t.id ASC, r.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut schedule: Vec<TalkWithAttendees> = Vec::new();

        while let Some(row) = rows.next()? {
            let talk_id: TalkId = row.get("id")?;
            let attendee_name: Option<String> = row.get("attendee_name")?;

            let starts_new_group = schedule
                .last()
                .map_or(true, |entry| entry.talk.id != talk_id);
            if starts_new_group {
                schedule.push(TalkWithAttendees {
                    talk: parse_talk_row(row)?,
                    attendee_names: Vec::new(),
                    attendee_count: 0,
                });
            }

            if let (Some(name), Some(entry)) = (attendee_name, schedule.last_mut()) {
                entry.attendee_names.push(name);
                entry.attendee_count += 1;
            }
        }

        Ok(schedule)
    }
}

pub(super) fn parse_talk_row(row: &Row<'_>) -> rusqlite::Result<Talk> {
    Ok(Talk {
        id: row.get("id")?,
        title: row.get("title")?,
        speaker: row.get("speaker")?,
        description: row.get("description")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        room: row.get("room")?,
        created_at: row.get("created_at")?,
    })
}
