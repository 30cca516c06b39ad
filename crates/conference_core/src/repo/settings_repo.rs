//! Conference settings repository over the singleton row.

use super::{RepoError, RepoResult, SqliteConferenceRepository};
use crate::model::settings::{normalize_conference_name, ConferenceSettings, SETTINGS_ROW_ID};
use rusqlite::{params, OptionalExtension};

/// Repository interface for the singleton settings row.
pub trait SettingsRepository {
    fn get_settings(&self) -> RepoResult<Option<ConferenceSettings>>;
    /// Stores the trimmed name and refreshes `updated_at`.
    ///
    /// Blank names are rejected before the connection is touched.
    fn update_conference_name(&self, name: &str) -> RepoResult<String>;
}

impl SettingsRepository for SqliteConferenceRepository<'_> {
    fn get_settings(&self) -> RepoResult<Option<ConferenceSettings>> {
        let settings = self
            .conn
            .query_row(
                "SELECT conference_name, updated_at FROM conference_settings WHERE id = ?1;",
                [SETTINGS_ROW_ID],
                |row| {
                    Ok(ConferenceSettings {
                        conference_name: row.get("conference_name")?,
                        updated_at: row.get("updated_at")?,
                    })
                },
            )
            .optional()?;
        Ok(settings)
    }

    fn update_conference_name(&self, name: &str) -> RepoResult<String> {
        let name = normalize_conference_name(name)?;

        let changed = self.conn.execute(
            "UPDATE conference_settings
             SET conference_name = ?1,
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = ?2;",
            params![name, SETTINGS_ROW_ID],
        )?;

        if changed == 0 {
            return Err(RepoError::SettingsMissing);
        }

        Ok(name.to_string())
    }
}
