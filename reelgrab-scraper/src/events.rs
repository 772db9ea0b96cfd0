use std::path::PathBuf;

/// Progress events emitted during a run, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum ScrapeEvent {
    /// A listing page was fetched and parsed.
    PageScraped { page: u32, found: usize },
    /// Pagination ended early because a page could not be fetched.
    PageFailed { page: u32, reason: String },
    /// All listing pages have been read.
    ListingComplete { total: usize },
    /// Detail-page lookups for missing years are starting.
    EnrichStarted { total: usize },
    /// One entry's year lookup finished (`None` if it could not be resolved).
    YearResolved {
        index: usize,
        name: String,
        year: Option<u16>,
    },
    /// Entries were read from an existing snapshot instead of scraping.
    SnapshotLoaded { path: PathBuf, count: usize },
    /// The scraped entries were written to a snapshot.
    SnapshotSaved { path: PathBuf, count: usize },
    /// The entry list is final; per-entry processing is about to start.
    EntriesReady { total: usize },
    /// A worker picked up an entry.
    EntryStarted { index: usize, label: String },
    /// Querying the index for an entry.
    EntryLookingUp { index: usize, label: String },
    /// Streaming the selected file for an entry.
    EntryDownloading { index: usize, label: String },
    EntryDownloaded {
        index: usize,
        label: String,
        path: PathBuf,
    },
    EntrySkipped {
        index: usize,
        label: String,
        reason: String,
    },
    EntryFailed {
        index: usize,
        label: String,
        reason: String,
    },
    /// Every entry has been processed.
    Done,
}
