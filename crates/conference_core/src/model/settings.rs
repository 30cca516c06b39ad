//! Singleton conference settings.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Fixed primary key of the only settings row.
pub const SETTINGS_ROW_ID: i64 = 1;

/// Name shown when the settings row has not been created yet.
pub const DEFAULT_CONFERENCE_NAME: &str = "Conference App";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceSettings {
    pub conference_name: String,
    pub updated_at: String,
}

/// Trims a requested conference name, rejecting blank input.
pub fn normalize_conference_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankConferenceName);
    }
    Ok(trimmed)
}
