//! Operator commands over a single store handle.

use anyhow::{Context, Result};
use conference_core::{AppConfig, ConferenceStore};

fn open_store(config: &AppConfig) -> Result<ConferenceStore> {
    ConferenceStore::open(&config.db_path, config.store)
        .with_context(|| format!("failed to open store at {}", config.db_path.display()))
}

pub fn init(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let service = store.service();

    let name = service.conference_name()?;
    let talks = service.list_talks()?;
    let attendees = service.list_attendees()?;

    println!("Conference: {name}");
    println!("  Database: {}", config.db_path.display());
    println!("  Port: {}", config.port);
    println!("  Talks: {}", talks.len());
    println!("  Attendees: {}", attendees.len());
    Ok(())
}

pub fn schedule(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let service = store.service();

    println!("{}", service.conference_name()?);
    for entry in service.list_talks_with_attendees()? {
        let talk = &entry.talk;
        println!(
            "{}-{}  {}  {} ({})",
            talk.start_time, talk.end_time, talk.room, talk.title, talk.speaker
        );
        if entry.attendee_names.is_empty() {
            println!("    no registrations");
        } else {
            println!(
                "    {} registered: {}",
                entry.attendee_count,
                entry.attendee_names.join(", ")
            );
        }
    }
    Ok(())
}

pub fn rename(config: &AppConfig, name: &str) -> Result<()> {
    let store = open_store(config)?;
    let stored = store
        .service()
        .update_conference_name(name)
        .context("rename failed")?;
    println!("Conference renamed to '{stored}'");
    Ok(())
}
