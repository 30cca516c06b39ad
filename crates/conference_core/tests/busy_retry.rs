//! Write contention against one database file from several connections.

use conference_core::{
    AttendeeDraft, ConferenceStore, RepoError, RetryPolicy, StoreOptions, TalkDraft,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Duration;

static EXHAUSTED_SLEEPS: Mutex<Vec<Duration>> = Mutex::new(Vec::new());
static RECOVERED_SLEEPS: Mutex<Vec<Duration>> = Mutex::new(Vec::new());
static CONSTRAINT_SLEEPS: Mutex<Vec<Duration>> = Mutex::new(Vec::new());

fn record_exhausted(delay: Duration) {
    EXHAUSTED_SLEEPS.lock().unwrap().push(delay);
}

fn record_recovered(delay: Duration) {
    RECOVERED_SLEEPS.lock().unwrap().push(delay);
    thread::sleep(delay);
}

fn record_constraint(delay: Duration) {
    CONSTRAINT_SLEEPS.lock().unwrap().push(delay);
}

/// Options that surface lock contention immediately instead of waiting.
fn impatient_options(base_delay: Duration) -> StoreOptions {
    StoreOptions {
        busy_timeout: Duration::ZERO,
        retry: RetryPolicy {
            base_delay,
            ..RetryPolicy::default()
        },
    }
}

fn talk() -> TalkDraft {
    TalkDraft {
        title: "Contended Talk".to_string(),
        speaker: "Writer".to_string(),
        description: None,
        start_time: "12:00".to_string(),
        end_time: "13:00".to_string(),
        room: "Room L".to_string(),
    }
}

fn temp_db() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conference.db");
    (dir, path)
}

fn hold_write_lock(path: &Path) -> Connection {
    let blocker = Connection::open(path).unwrap();
    blocker.execute_batch("BEGIN IMMEDIATE;").unwrap();
    blocker
}

fn talk_count(path: &Path) -> i64 {
    Connection::open(path)
        .unwrap()
        .query_row("SELECT COUNT(*) FROM talks;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn persistent_lock_exhausts_budget_and_surfaces_busy() {
    let (_dir, path) = temp_db();
    let store =
        ConferenceStore::open(&path, impatient_options(Duration::from_millis(100)))
            .unwrap();
    let blocker = hold_write_lock(&path);

    let service = store.service().with_sleep(record_exhausted);
    let err = service.create_talk(&talk()).unwrap_err();

    assert!(err.is_busy(), "unexpected error: {err}");
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(
        *EXHAUSTED_SLEEPS.lock().unwrap(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );

    blocker.execute_batch("ROLLBACK;").unwrap();
    assert_eq!(talk_count(&path), 3);
}

#[test]
fn released_lock_lets_a_retry_succeed() {
    let (_dir, path) = temp_db();
    let store =
        ConferenceStore::open(&path, impatient_options(Duration::from_millis(200)))
            .unwrap();

    let (locked_tx, locked_rx) = mpsc::channel();
    let blocker_path = path.clone();
    let blocker = thread::spawn(move || {
        let conn = hold_write_lock(&blocker_path);
        locked_tx.send(()).unwrap();
        thread::sleep(Duration::from_millis(80));
        conn.execute_batch("COMMIT;").unwrap();
    });
    locked_rx.recv().unwrap();

    let service = store.service().with_sleep(record_recovered);
    let id = service.create_talk(&talk()).unwrap();
    blocker.join().unwrap();

    assert_eq!(
        *RECOVERED_SLEEPS.lock().unwrap(),
        vec![Duration::from_millis(200)]
    );
    assert_eq!(service.get_talk(id).unwrap().unwrap().title, "Contended Talk");
    assert_eq!(talk_count(&path), 4);
}

#[test]
fn constraint_violation_is_never_retried() {
    let (_dir, path) = temp_db();
    let store = ConferenceStore::open(&path, StoreOptions::default()).unwrap();
    let service = store.service().with_sleep(record_constraint);

    service
        .create_attendee(&AttendeeDraft::new("One", "same@example.com"))
        .unwrap();
    let err = service
        .create_attendee(&AttendeeDraft::new("Two", "same@example.com"))
        .unwrap_err();

    assert!(matches!(err, RepoError::DuplicateEmail(_)));
    assert!(CONSTRAINT_SLEEPS.lock().unwrap().is_empty());
}

#[test]
fn reads_proceed_while_another_connection_writes() {
    let (_dir, path) = temp_db();
    let store =
        ConferenceStore::open(&path, impatient_options(Duration::from_millis(1)))
            .unwrap();
    let blocker = hold_write_lock(&path);
    blocker
        .execute(
            "INSERT INTO talks (title, speaker, start_time, end_time, room)
             VALUES ('Uncommitted', 'Nobody', '08:00', '09:00', 'Attic');",
            [],
        )
        .unwrap();

    let talks = store.service().list_talks().unwrap();
    assert_eq!(talks.len(), 3);
    assert!(talks.iter().all(|talk| talk.title != "Uncommitted"));

    blocker.execute_batch("COMMIT;").unwrap();
    assert_eq!(store.service().list_talks().unwrap().len(), 4);
}

#[test]
fn ordered_delete_retries_as_one_unit() {
    let (_dir, path) = temp_db();
    let store =
        ConferenceStore::open(&path, impatient_options(Duration::from_millis(40)))
            .unwrap();
    let service = store.service();

    let talk_id = service.list_talks().unwrap()[0].id;
    let attendee = service
        .create_attendee(&AttendeeDraft::new("Holder", "holder@example.com"))
        .unwrap();
    service.register_for_talk(attendee, talk_id).unwrap();

    let (locked_tx, locked_rx) = mpsc::channel();
    let blocker_path = path.clone();
    let blocker = thread::spawn(move || {
        let conn = hold_write_lock(&blocker_path);
        locked_tx.send(()).unwrap();
        thread::sleep(Duration::from_millis(20));
        conn.execute_batch("ROLLBACK;").unwrap();
    });
    locked_rx.recv().unwrap();

    let outcome = service.delete_talk(talk_id).unwrap();
    blocker.join().unwrap();

    assert_eq!(outcome.registrations_removed, 1);
    assert!(outcome.parent_removed);
    assert_eq!(service.get_talk(talk_id).unwrap(), None);
}

#[test]
fn concurrent_writers_all_succeed_with_store_timeout() {
    let (_dir, path) = temp_db();
    ConferenceStore::open(&path, StoreOptions::default()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            thread::spawn(move || {
                let store = ConferenceStore::open(&path, StoreOptions::default()).unwrap();
                let service = store.service();
                for round in 0..10 {
                    service
                        .create_attendee(&AttendeeDraft::new(
                            format!("Worker {worker}"),
                            format!("worker{worker}-{round}@example.com"),
                        ))
                        .unwrap();
                    service
                        .update_conference_name(&format!("Worker {worker} Fest {round}"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let store = ConferenceStore::open(&path, StoreOptions::default()).unwrap();
    assert_eq!(store.service().list_attendees().unwrap().len(), 40);
    assert!(store.service().conference_name().unwrap().starts_with("Worker "));
}
