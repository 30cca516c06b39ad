//! Conference use-case service.
//!
//! # Responsibility
//! - Provide the domain operations external callers (HTTP handlers, CLI)
//!   invoke.
//! - Apply the bounded busy-retry policy around each write as one unit.
//!
//! # Invariants
//! - A retried write re-runs the whole repository call, including every
//!   statement of an ordered delete.
//! - Validation and constraint errors are returned on the first attempt.
//! - Reads are not retried.

use crate::db::RetryPolicy;
use crate::model::attendee::{
    Attendee, AttendeeDraft, AttendeeId, AttendeeSummary, RegistrationId,
};
use crate::model::settings::{ConferenceSettings, DEFAULT_CONFERENCE_NAME};
use crate::model::talk::{Talk, TalkDraft, TalkId, TalkWithAttendees};
use crate::repo::{ConferenceRepository, DeleteOutcome, RepoResult};
use std::time::Duration;

/// Use-case service over a conference repository.
pub struct ConferenceService<R: ConferenceRepository> {
    repo: R,
    retry: RetryPolicy,
    sleep: fn(Duration),
}

impl<R: ConferenceRepository> ConferenceService<R> {
    /// Creates a service with the default retry policy.
    pub fn new(repo: R) -> Self {
        Self::with_retry_policy(repo, RetryPolicy::default())
    }

    pub fn with_retry_policy(repo: R, retry: RetryPolicy) -> Self {
        Self {
            repo,
            retry,
            sleep: std::thread::sleep,
        }
    }

    /// Replaces the function used to wait between retries.
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    fn write<T, F>(&self, label: &str, mut operation: F) -> RepoResult<T>
    where
        F: FnMut(&R) -> RepoResult<T>,
    {
        self.retry
            .run_with_sleep(label, self.sleep, || operation(&self.repo))
    }

    pub fn create_talk(&self, draft: &TalkDraft) -> RepoResult<TalkId> {
        self.write("create_talk", |repo| repo.create_talk(draft))
    }

    /// Replaces every editable field of an existing talk.
    ///
    /// Returns `TalkNotFound` when no talk has this id.
    pub fn update_talk(&self, id: TalkId, draft: &TalkDraft) -> RepoResult<()> {
        self.write("update_talk", |repo| repo.update_talk(id, draft))
    }

    /// Deletes a talk and every registration for it.
    ///
    /// # Contract
    /// - Registrations are deleted first; if that fails the talk remains.
    /// - Deleting a missing talk succeeds with `parent_removed = false`.
    pub fn delete_talk(&self, id: TalkId) -> RepoResult<DeleteOutcome> {
        self.write("delete_talk", |repo| repo.delete_talk(id))
    }

    /// Creates an attendee.
    ///
    /// Returns `DuplicateEmail` without retrying when the email is taken.
    pub fn create_attendee(&self, draft: &AttendeeDraft) -> RepoResult<AttendeeId> {
        self.write("create_attendee", |repo| repo.create_attendee(draft))
    }

    /// Deletes an attendee and every registration they hold.
    pub fn delete_attendee(&self, id: AttendeeId) -> RepoResult<DeleteOutcome> {
        self.write("delete_attendee", |repo| repo.delete_attendee(id))
    }

    /// Registers an attendee for a talk.
    ///
    /// # Contract
    /// - A repeated pair returns `AlreadyRegistered`.
    /// - A missing attendee or talk returns `UnknownReference`.
    pub fn register_for_talk(
        &self,
        attendee_id: AttendeeId,
        talk_id: TalkId,
    ) -> RepoResult<RegistrationId> {
        self.write("register_for_talk", |repo| repo.register(attendee_id, talk_id))
    }

    /// Removes one registration; returns whether a row existed.
    pub fn unregister_from_talk(
        &self,
        attendee_id: AttendeeId,
        talk_id: TalkId,
    ) -> RepoResult<bool> {
        self.write("unregister_from_talk", |repo| {
            repo.unregister(attendee_id, talk_id)
        })
    }

    /// Renames the conference and returns the stored (trimmed) name.
    pub fn update_conference_name(&self, name: &str) -> RepoResult<String> {
        self.write("update_conference_name", |repo| {
            repo.update_conference_name(name)
        })
    }

    pub fn list_talks(&self) -> RepoResult<Vec<Talk>> {
        self.repo.list_talks()
    }

    pub fn get_talk(&self, id: TalkId) -> RepoResult<Option<Talk>> {
        self.repo.get_talk(id)
    }

    /// Schedule view: talks by start time, each with its registrants.
    pub fn list_talks_with_attendees(&self) -> RepoResult<Vec<TalkWithAttendees>> {
        self.repo.list_talks_with_attendees()
    }

    pub fn list_attendees(&self) -> RepoResult<Vec<AttendeeSummary>> {
        self.repo.list_attendees()
    }

    pub fn get_attendee(&self, id: AttendeeId) -> RepoResult<Option<Attendee>> {
        self.repo.get_attendee(id)
    }

    pub fn list_talk_registrants(&self, talk_id: TalkId) -> RepoResult<Vec<Attendee>> {
        self.repo.list_talk_registrants(talk_id)
    }

    pub fn list_attendee_talks(&self, attendee_id: AttendeeId) -> RepoResult<Vec<Talk>> {
        self.repo.list_attendee_talks(attendee_id)
    }

    pub fn conference_settings(&self) -> RepoResult<Option<ConferenceSettings>> {
        self.repo.get_settings()
    }

    /// Current conference name, or `"Conference App"` before seeding.
    pub fn conference_name(&self) -> RepoResult<String> {
        Ok(self
            .repo
            .get_settings()?
            .map(|settings| settings.conference_name)
            .unwrap_or_else(|| DEFAULT_CONFERENCE_NAME.to_string()))
    }
}
