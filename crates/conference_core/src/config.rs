//! Process configuration shared by conference front ends.
//!
//! The CLI fills this from flags and environment variables; HTTP front ends
//! use `port` for their listener.

use crate::db::StoreOptions;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_PATH: &str = "data/conference.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Store file; its directory is created at startup when absent.
    pub db_path: PathBuf,
    pub store: StoreOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            store: StoreOptions::default(),
        }
    }
}
