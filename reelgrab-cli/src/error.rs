use thiserror::Error;

use reelgrab_lib::{SettingsError, SnapshotError};
use reelgrab_scraper::ScrapeError;

/// Errors that end a CLI command with a non-zero exit status.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Scrape(#[from] ScrapeError),

    #[error("Could not write CSV: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
