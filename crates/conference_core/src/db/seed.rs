//! First-run data for an empty conference store.
//!
//! # Invariants
//! - Sample talks are inserted only when `talks` is empty.
//! - The settings row is inserted with `INSERT OR IGNORE`, so at most one
//!   row ever exists even when several instances start at once.
//! - Both checks run inside one immediate transaction.

use super::DbResult;
use log::info;
use rand::Rng;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

const NAME_PREFIXES: &[&str] = &["Mega", "Ultra", "Hyper", "Quantum", "Cosmic"];
const NAME_THEMES: &[&str] = &["Code", "Tech", "Dev", "Hack", "Data"];
const NAME_SUFFIXES: &[&str] = &["Con", "Fest", "Summit", "Palooza", "Conf"];
const NAME_ERAS: &[&str] = &["2024", "3000", "Infinity", "Forever", "Ultimate"];

struct SampleTalk {
    title: &'static str,
    speaker: &'static str,
    description: &'static str,
    start_time: &'static str,
    end_time: &'static str,
    room: &'static str,
}

const SAMPLE_TALKS: &[SampleTalk] = &[
    SampleTalk {
        title: "Opening Keynote",
        speaker: "Jane Smith",
        description: "Welcome to the conference and overview of the day",
        start_time: "09:00",
        end_time: "10:00",
        room: "Main Hall",
    },
    SampleTalk {
        title: "Introduction to Web Development",
        speaker: "John Doe",
        description: "Learn the basics of modern web development",
        start_time: "10:30",
        end_time: "11:30",
        room: "Room A",
    },
    SampleTalk {
        title: "Database Design Best Practices",
        speaker: "Alice Johnson",
        description: "Tips and tricks for effective database design",
        start_time: "10:30",
        end_time: "11:30",
        room: "Room B",
    },
];

/// What a seeding pass inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub talks_inserted: usize,
    pub settings_inserted: bool,
}

/// Builds a conference name from the prefix x theme x suffix x era lists.
pub fn generate_conference_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut pick = |words: &[&'static str]| words[rng.gen_range(0..words.len())];
    let prefix = pick(NAME_PREFIXES);
    let theme = pick(NAME_THEMES);
    let suffix = pick(NAME_SUFFIXES);
    let era = pick(NAME_ERAS);
    format!("{prefix} {theme} {suffix} {era}")
}

/// Seeds sample talks and the settings row when they are absent.
pub fn seed_if_empty(conn: &Connection) -> DbResult<SeedReport> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let mut report = SeedReport::default();

    let talk_count: i64 = tx.query_row("SELECT COUNT(*) FROM talks;", [], |row| row.get(0))?;
    if talk_count == 0 {
        let mut stmt = tx.prepare(
            "INSERT INTO talks (title, speaker, description, start_time, end_time, room)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        )?;
        for talk in SAMPLE_TALKS {
            stmt.execute(params![
                talk.title,
                talk.speaker,
                talk.description,
                talk.start_time,
                talk.end_time,
                talk.room,
            ])?;
            report.talks_inserted += 1;
        }
    }

    let name = generate_conference_name(&mut rand::thread_rng());
    let inserted = tx.execute(
        "INSERT OR IGNORE INTO conference_settings (id, conference_name) VALUES (1, ?1);",
        [name.as_str()],
    )?;
    report.settings_inserted = inserted == 1;

    tx.commit()?;

    if report.talks_inserted > 0 || report.settings_inserted {
        info!(
            "event=db_seed module=db status=ok talks_inserted={} settings_inserted={}",
            report.talks_inserted, report.settings_inserted
        );
    }
    Ok(report)
}
