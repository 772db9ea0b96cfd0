pub mod client;
pub mod download;
pub mod enrich;
pub mod error;
pub mod events;
pub mod index;
pub mod layout;
pub mod log;
pub mod paginate;
pub mod pipeline;
pub mod rated;
pub mod site;

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;

pub use client::{ClientConfig, HttpClient};
pub use download::{DownloadOutcome, Downloader};
pub use error::ScrapeError;
pub use events::ScrapeEvent;
pub use index::IndexClient;
pub use layout::LetterboxdLayout;
pub use self::log::{LogEntry, LogSummary, RunLog, SkipReason};
pub use pipeline::{EntrySource, Pipeline, PipelineOptions, RunReport};
pub use rated::{MutualFilm, RatedFilm, mutual_films};
pub use site::LetterboxdSite;
