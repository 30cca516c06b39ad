//! Conference domain model.
//!
//! # Responsibility
//! - Define the rows owned by the conference store and the read models
//!   aggregated from them.
//! - Validate write inputs before they reach SQLite.
//!
//! # Invariants
//! - Identifiers are assigned by SQLite and never reused by callers.
//! - Timestamps are SQLite `CURRENT_TIMESTAMP` text (`YYYY-MM-DD HH:MM:SS`).

pub mod attendee;
pub mod settings;
pub mod talk;
pub mod validation;
