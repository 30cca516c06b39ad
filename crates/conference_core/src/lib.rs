//! Core persistence and domain operations for the conference app.
//! This crate is the single source of truth for store invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::AppConfig;
pub use db::{DbError, DbResult, RetryPolicy, StoreOptions, Transient};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attendee::{Attendee, AttendeeDraft, AttendeeId, AttendeeSummary, RegistrationId};
pub use model::settings::{ConferenceSettings, DEFAULT_CONFERENCE_NAME};
pub use model::talk::{Talk, TalkDraft, TalkId, TalkWithAttendees};
pub use model::validation::ValidationError;
pub use repo::{
    AttendeeRepository, ConferenceRepository, DeleteOutcome, RegistrationRepository, RepoError,
    RepoResult, SettingsRepository, SqliteConferenceRepository, TalkRepository,
};
pub use service::conference_service::ConferenceService;
pub use store::ConferenceStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
