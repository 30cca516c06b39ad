//! Talk model and talk-centric read models.
//!
//! # Invariants
//! - `title`, `speaker`, `start_time`, `end_time` and `room` are non-blank.
//! - `start_time`/`end_time` follow the `HH:MM` convention; ordering between
//!   them is not enforced.

use super::validation::{require, ValidationError};
use serde::{Deserialize, Serialize};

/// SQLite-assigned talk identifier.
pub type TalkId = i64;

/// Persisted talk row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub id: TalkId,
    pub title: String,
    pub speaker: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub created_at: String,
}

/// Caller input for creating or replacing a talk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkDraft {
    pub title: String,
    pub speaker: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
}

impl TalkDraft {
    /// Checks required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("speaker", &self.speaker)?;
        require("start_time", &self.start_time)?;
        require("end_time", &self.end_time)?;
        require("room", &self.room)?;
        Ok(())
    }
}

/// Schedule view row: one talk plus everyone registered for it.
///
/// Order of `attendee_names` is unspecified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkWithAttendees {
    #[serde(flatten)]
    pub talk: Talk,
    pub attendee_names: Vec<String>,
    pub attendee_count: usize,
}
