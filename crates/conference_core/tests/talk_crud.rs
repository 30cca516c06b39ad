use conference_core::{
    AttendeeDraft, ConferenceStore, RepoError, StoreOptions, TalkDraft, ValidationError,
};

fn setup() -> ConferenceStore {
    ConferenceStore::open_in_memory(StoreOptions::default()).unwrap()
}

fn draft(title: &str, start_time: &str) -> TalkDraft {
    TalkDraft {
        title: title.to_string(),
        speaker: "Sam Lee".to_string(),
        description: Some("Lessons learned".to_string()),
        start_time: start_time.to_string(),
        end_time: "23:00".to_string(),
        room: "Room C".to_string(),
    }
}

#[test]
fn seeded_talks_are_listed_by_start_time_then_insertion_order() {
    let store = setup();
    let talks = store.service().list_talks().unwrap();

    let titles: Vec<&str> = talks.iter().map(|talk| talk.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Opening Keynote",
            "Introduction to Web Development",
            "Database Design Best Practices",
        ]
    );
}

#[test]
fn create_and_get_roundtrip() {
    let store = setup();
    let service = store.service();

    let id = service.create_talk(&draft("Async Rust", "15:00")).unwrap();
    let talk = service.get_talk(id).unwrap().unwrap();

    assert_eq!(talk.id, id);
    assert_eq!(talk.title, "Async Rust");
    assert_eq!(talk.description.as_deref(), Some("Lessons learned"));
    assert_eq!(talk.start_time, "15:00");
    assert!(!talk.created_at.is_empty());
}

#[test]
fn description_is_optional() {
    let store = setup();
    let service = store.service();

    let mut talk = draft("Lightning Talks", "16:00");
    talk.description = None;
    let id = service.create_talk(&talk).unwrap();

    assert_eq!(service.get_talk(id).unwrap().unwrap().description, None);
}

#[test]
fn blank_required_field_is_rejected_before_insert() {
    let store = setup();
    let service = store.service();

    let mut talk = draft("Untitled", "16:00");
    talk.speaker = "  ".to_string();
    let err = service.create_talk(&talk).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankField("speaker"))
    ));
    assert_eq!(service.list_talks().unwrap().len(), 3);
}

#[test]
fn update_existing_talk() {
    let store = setup();
    let service = store.service();

    let id = service.create_talk(&draft("Draft", "15:00")).unwrap();
    let mut updated = draft("Final Title", "08:00");
    updated.room = "Main Hall".to_string();
    service.update_talk(id, &updated).unwrap();

    let talk = service.get_talk(id).unwrap().unwrap();
    assert_eq!(talk.title, "Final Title");
    assert_eq!(talk.room, "Main Hall");
    assert_eq!(service.list_talks().unwrap()[0].id, id);
}

#[test]
fn update_missing_talk_returns_not_found() {
    let store = setup();

    let err = store
        .service()
        .update_talk(9_999, &draft("Ghost", "12:00"))
        .unwrap_err();
    assert!(matches!(err, RepoError::TalkNotFound(9_999)));
}

#[test]
fn delete_talk_removes_registrations_then_talk() {
    let store = setup();
    let service = store.service();

    let talk_id = service.create_talk(&draft("Popular", "14:00")).unwrap();
    let other_talk = service.list_talks().unwrap()[0].id;
    for index in 0..3 {
        let attendee = service
            .create_attendee(&AttendeeDraft::new(
                format!("Attendee {index}"),
                format!("attendee{index}@example.com"),
            ))
            .unwrap();
        service.register_for_talk(attendee, talk_id).unwrap();
        service.register_for_talk(attendee, other_talk).unwrap();
    }

    let outcome = service.delete_talk(talk_id).unwrap();

    assert_eq!(outcome.registrations_removed, 3);
    assert!(outcome.parent_removed);
    assert_eq!(service.get_talk(talk_id).unwrap(), None);
    assert_eq!(registrations_for_talk(&store, talk_id), 0);
    assert_eq!(registrations_for_talk(&store, other_talk), 3);
}

#[test]
fn delete_missing_talk_is_a_no_op() {
    let store = setup();

    let outcome = store.service().delete_talk(9_999).unwrap();
    assert_eq!(outcome.registrations_removed, 0);
    assert!(!outcome.parent_removed);
}

#[test]
fn failed_registration_delete_keeps_the_talk() {
    let store = setup();
    let service = store.service();

    let talk_id = service.create_talk(&draft("Guarded", "14:00")).unwrap();
    let attendee = service
        .create_attendee(&AttendeeDraft::new("Robin", "robin@example.com"))
        .unwrap();
    service.register_for_talk(attendee, talk_id).unwrap();

    store
        .connection()
        .execute_batch(
            "CREATE TRIGGER block_registration_delete
             BEFORE DELETE ON registrations
             BEGIN
                SELECT RAISE(ABORT, 'registration delete blocked');
             END;",
        )
        .unwrap();

    let err = service.delete_talk(talk_id).unwrap_err();

    assert!(matches!(err, RepoError::Db(_)), "unexpected error: {err}");
    assert!(!err.is_busy());
    assert!(service.get_talk(talk_id).unwrap().is_some());
    assert_eq!(registrations_for_talk(&store, talk_id), 1);
}

#[test]
fn schedule_groups_registrants_per_talk() {
    let store = setup();
    let service = store.service();

    let keynote = service.list_talks().unwrap()[0].id;
    let late_talk = service.create_talk(&draft("Closing", "17:00")).unwrap();
    let ada = service
        .create_attendee(&AttendeeDraft::new("Ada", "ada@example.com"))
        .unwrap();
    let linus = service
        .create_attendee(&AttendeeDraft::new("Linus", "linus@example.com"))
        .unwrap();
    service.register_for_talk(ada, keynote).unwrap();
    service.register_for_talk(linus, keynote).unwrap();
    service.register_for_talk(ada, late_talk).unwrap();

    let schedule = service.list_talks_with_attendees().unwrap();

    assert_eq!(schedule.len(), 4);
    assert_eq!(schedule[0].talk.id, keynote);
    let mut keynote_names = schedule[0].attendee_names.clone();
    keynote_names.sort();
    assert_eq!(keynote_names, vec!["Ada".to_string(), "Linus".to_string()]);
    assert_eq!(schedule[0].attendee_count, 2);

    assert_eq!(schedule[1].attendee_count, 0);
    assert!(schedule[1].attendee_names.is_empty());

    let last = schedule.last().unwrap();
    assert_eq!(last.talk.id, late_talk);
    assert_eq!(last.attendee_names, vec!["Ada".to_string()]);
    assert_eq!(last.attendee_count, 1);
}

#[test]
fn schedule_row_serializes_flat_for_http_callers() {
    let store = setup();
    let schedule = store.service().list_talks_with_attendees().unwrap();

    let json = serde_json::to_value(&schedule[0]).unwrap();
    assert_eq!(json["title"], "Opening Keynote");
    assert_eq!(json["room"], "Main Hall");
    assert_eq!(json["attendee_count"], 0);
    assert!(json["attendee_names"].as_array().unwrap().is_empty());
    assert!(json.get("talk").is_none());
}

fn registrations_for_talk(store: &ConferenceStore, talk_id: i64) -> i64 {
    store
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM registrations WHERE talk_id = ?1;",
            [talk_id],
            |row| row.get(0),
        )
        .unwrap()
}
