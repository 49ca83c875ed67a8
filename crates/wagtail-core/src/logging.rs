//! Logging initialization for applications embedding the store.
//!
//! The library only emits `tracing` events; nothing is printed unless the
//! host installs a subscriber, either its own or the one set up here.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::{Error, Result};

/// Verbosity requested by the host application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Include debug events (request dispatch, superseded responses)
    pub verbose: bool,
    /// Only report errors
    pub quiet: bool,
}

impl LogOptions {
    /// Maximum level to record. `verbose` wins over `quiet`.
    pub const fn level(self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::WARN
        }
    }
}

/// Install a global formatting subscriber that writes to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init_logging(options: LogOptions) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(options.level())
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to install log subscriber: {e}")))
}
