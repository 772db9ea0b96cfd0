use reelgrab_lib::SnapshotError;

/// Errors that can occur while scraping, looking up, or downloading.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Connection, DNS, TLS or body-read failure
    #[error("Network error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body was not the JSON or markup we expected
    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Not found in index (no exact match for \"{title}\" ({year}))")]
    NotFound { title: String, year: u16 },

    #[error("No suitable quality found (wanted {wanted})")]
    NoSuitableQuality { wanted: String },

    #[error("Release year unknown")]
    UnknownYear,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ScrapeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e)
        }
    }
}

impl ScrapeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short machine-friendly name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "non-2xx-status",
            Self::Decode(_) => "decode",
            Self::NotFound { .. } => "no-match",
            Self::NoSuitableQuality { .. } => "no-suitable-quality",
            Self::UnknownYear => "unknown-year",
            Self::Io(_) | Self::Snapshot(_) => "io",
            Self::Config(_) => "config",
        }
    }
}
