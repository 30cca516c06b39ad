//! Attendee and registration models.
//!
//! # Invariants
//! - `email` is globally unique (enforced by the store).
//! - At most one registration exists per `(attendee_id, talk_id)`.

use super::validation::{require, ValidationError};
use serde::{Deserialize, Serialize};

/// SQLite-assigned attendee identifier.
pub type AttendeeId = i64;

/// SQLite-assigned registration identifier.
pub type RegistrationId = i64;

/// Persisted attendee row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: AttendeeId,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// Caller input for registering a new attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeDraft {
    pub name: String,
    pub email: String,
}

impl AttendeeDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        Ok(())
    }
}

/// Organizer listing row: attendee plus how many talks they joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeSummary {
    #[serde(flatten)]
    pub attendee: Attendee,
    pub registered_talks_count: usize,
}
