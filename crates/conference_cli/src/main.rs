//! Conference store operator CLI.
//!
//! # Responsibility
//! - Act as the composition root: read configuration, start logging, and
//!   open explicitly owned store handles.
//! - Expose operator commands and the concurrency load-test harness.

mod commands;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use conference_core::{
    config::{DEFAULT_DB_PATH, DEFAULT_PORT},
    default_log_level, init_logging, AppConfig, RetryPolicy, StoreOptions,
};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line interface for the conference store.
#[derive(Parser, Debug)]
#[command(name = "conference")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite database file (parent directory is created when absent)
    #[arg(long, env = "CONFERENCE_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// Listener port reported to front ends
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CONFERENCE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotated log files; stderr only when omitted
    #[arg(long, env = "CONFERENCE_LOG_DIR")]
    log_dir: Option<String>,

    /// How long a connection waits on a locked database before failing
    #[arg(long, env = "CONFERENCE_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    busy_timeout_ms: u64,

    /// Attempts per write, including the first one
    #[arg(long, env = "CONFERENCE_RETRY_ATTEMPTS", default_value_t = 3)]
    retry_attempts: u32,

    /// Backoff unit; attempt n waits n times this long
    #[arg(long, env = "CONFERENCE_RETRY_BASE_DELAY_MS", default_value_t = 100)]
    retry_base_delay_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Open (and on first use initialize) the store, then print a summary
    Init,
    /// Print every talk with its registered attendees
    Schedule,
    /// Change the conference name
    Rename {
        /// New name; surrounding whitespace is trimmed
        name: String,
    },
    /// Hammer one database file from several independent store handles
    LoadTest {
        /// Concurrent workers, each with its own connection
        #[arg(short, long, default_value_t = 4)]
        workers: usize,
        /// Operation rounds per worker
        #[arg(short, long, default_value_t = 10)]
        rounds: usize,
    },
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            port: self.port,
            db_path: self.db_path.clone(),
            store: StoreOptions {
                busy_timeout: Duration::from_millis(self.busy_timeout_ms),
                retry: RetryPolicy {
                    max_attempts: self.retry_attempts,
                    base_delay: Duration::from_millis(self.retry_base_delay_ms),
                    ..RetryPolicy::default()
                },
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, cli.log_dir.as_deref())
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;

    let config = cli.app_config();
    log::info!(
        "event=cli_start module=cli status=ok command={:?} db_path={} port={}",
        cli.command,
        config.db_path.display(),
        config.port
    );

    match cli.command {
        Commands::Init => commands::init(&config)?,
        Commands::Schedule => commands::schedule(&config)?,
        Commands::Rename { name } => commands::rename(&config, &name)?,
        Commands::LoadTest { workers, rounds } => {
            let report = load_test::run(&config, load_test::LoadTestOptions { workers, rounds })?;
            print!("{report}");
        }
    }

    Ok(())
}
