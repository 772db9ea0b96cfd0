use std::fmt;
use std::path::{Path, PathBuf};

use reelgrab_lib::util::pluralize;

/// Why an entry was skipped rather than downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyDownloaded(PathBuf),
    InLibrary(String),
    NoSuitableQuality,
    DryRun,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyDownloaded(path) => write!(f, "already downloaded ({})", path.display()),
            Self::InLibrary(dir) => write!(f, "'{}' already exists", dir),
            Self::NoSuitableQuality => f.write_str("no suitable quality found"),
            Self::DryRun => f.write_str("dry run"),
        }
    }
}

/// A single entry in the run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Downloaded { label: String, path: PathBuf },
    Skipped { label: String, reason: SkipReason },
    Failed { label: String, reason: String },
}

impl LogEntry {
    pub fn label(&self) -> &str {
        match self {
            Self::Downloaded { label, .. }
            | Self::Skipped { label, .. }
            | Self::Failed { label, .. } => label,
        }
    }
}

/// Outcome buckets for one run, in the order results arrived.
///
/// Owned by the single consumer of worker results; workers never touch it.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn downloaded(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Downloaded { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Skipped { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Failed { .. }))
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary::default();
        for entry in &self.entries {
            match entry {
                LogEntry::Downloaded { .. } => summary.downloaded += 1,
                LogEntry::Skipped { .. } => summary.skipped += 1,
                LogEntry::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Write the summary and per-entry details to a text file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        let summary = self.summary();

        writeln!(file, "=== Run Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Downloaded: {}", pluralize(summary.downloaded, "movie"))?;
        writeln!(file, "Skipped: {}", pluralize(summary.skipped, "movie"))?;
        writeln!(file, "Failed: {}", pluralize(summary.failed, "movie"))?;
        writeln!(file, "Total: {}", pluralize(summary.total(), "movie"))?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                LogEntry::Downloaded { label, path } => {
                    writeln!(file, "[OK] {} -> {}", label, path.display())?;
                }
                LogEntry::Skipped { label, reason } => {
                    writeln!(file, "[SKIPPED] {}: {}", label, reason)?;
                }
                LogEntry::Failed { label, reason } => {
                    writeln!(file, "[FAILED] {}: {}", label, reason)?;
                }
            }
        }

        file.flush()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl LogSummary {
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}
