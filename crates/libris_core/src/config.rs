//! Controller configuration.
//!
//! # Invariants
//! - `autosave_poll` bounds how long shutdown waits for the autosave thread.
//! - A zero poll tick is raised to `MIN_AUTOSAVE_POLL` to avoid busy looping.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DB_FILE: &str = "library_db.txt";
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_AUTOSAVE_POLL: Duration = Duration::from_millis(100);
pub const MIN_AUTOSAVE_POLL: Duration = Duration::from_millis(1);

/// Settings for opening a `Library`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Persisted record file, read at open and rewritten by every save.
    pub db_path: PathBuf,
    /// Time between two autosave runs.
    pub autosave_interval: Duration,
    /// How often the autosave thread checks its stop flag.
    pub autosave_poll: Duration,
}

impl LibraryConfig {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }

    pub fn with_autosave_poll(mut self, poll: Duration) -> Self {
        self.autosave_poll = poll;
        self
    }

    pub(crate) fn effective_poll(&self) -> Duration {
        self.autosave_poll
            .min(self.autosave_interval)
            .max(MIN_AUTOSAVE_POLL)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
            autosave_poll: DEFAULT_AUTOSAVE_POLL,
        }
    }
}
