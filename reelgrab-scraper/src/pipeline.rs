//! The end-to-end run: collect entries, resolve years, save a snapshot, then
//! look up, select and download each entry on a bounded worker pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reelgrab_core::{Entry, ListingLayout, QualityPreference};
use reelgrab_lib::snapshot::{read_snapshot, snapshot_file_name, write_snapshot};
use reelgrab_lib::{Settings, WorkerPool};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::client::{ClientConfig, HttpClient};
use crate::download::{DownloadOutcome, Downloader};
use crate::error::ScrapeError;
use crate::events::ScrapeEvent;
use crate::index::IndexClient;
use crate::log::{LogEntry, RunLog, SkipReason};
use crate::site::LetterboxdSite;

/// Everything a run needs to know, resolved from settings and flags.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub client: ClientConfig,
    pub base_url: String,
    pub page_size: usize,
    pub max_pages: u32,
    pub page_delay: Duration,
    pub enrich_workers: usize,
    pub index_url: String,
    pub output_dir: PathBuf,
    pub library_dir: Option<PathBuf>,
    pub snapshot_dir: PathBuf,
    pub extension: String,
    pub workers: usize,
    pub quality: QualityPreference,
    /// Look up and select, but do not download
    pub dry_run: bool,
    /// Write (or reuse) a snapshot in username mode
    pub save_snapshot: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::build(&Settings::default(), QualityPreference::default())
    }
}

impl PipelineOptions {
    pub fn from_settings(settings: &Settings) -> Result<Self, ScrapeError> {
        let quality = QualityPreference::from_names(&settings.download.quality)
            .map_err(|e| ScrapeError::config(format!("download.quality: {e}")))?;
        if quality.tiers().is_empty() {
            return Err(ScrapeError::config("download.quality: list is empty"));
        }
        Ok(Self::build(settings, quality))
    }

    fn build(settings: &Settings, quality: QualityPreference) -> Self {
        let lb = &settings.letterboxd;
        let dl = &settings.download;
        Self {
            client: ClientConfig {
                user_agent: lb.user_agent.clone(),
                request_timeout: Duration::from_secs(lb.request_timeout_secs),
                download_timeout: Duration::from_secs(dl.connect_timeout_secs),
            },
            base_url: lb.base_url.clone(),
            page_size: lb.page_size,
            max_pages: lb.max_pages,
            page_delay: Duration::from_millis(lb.page_delay_ms),
            enrich_workers: lb.enrich_workers,
            index_url: settings.index.api_url.clone(),
            output_dir: dl.output_dir.clone(),
            library_dir: dl.library_dir.clone(),
            snapshot_dir: dl.snapshot_dir.clone(),
            extension: dl.extension.clone(),
            workers: dl.workers,
            quality,
            dry_run: false,
            save_snapshot: true,
        }
    }
}

/// Where the entries of a run come from. Exactly one per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    Watchlist { user: String },
    Snapshot { path: PathBuf },
    Manual { title: String, year: u16 },
}

impl EntrySource {
    /// Pick the input mode from command-line arguments.
    ///
    /// Fails with a config error when no mode or more than one mode is
    /// given, or when only one of title and year is present.
    pub fn from_args(
        user: Option<String>,
        file: Option<PathBuf>,
        title: Option<String>,
        year: Option<u16>,
    ) -> Result<Self, ScrapeError> {
        let manual = title.is_some() || year.is_some();
        let modes = [user.is_some(), file.is_some(), manual]
            .iter()
            .filter(|&&m| m)
            .count();
        if modes > 1 {
            return Err(ScrapeError::config(
                "choose only one of a username (-u), a watchlist file (-f), or a title and year (-t/-y)",
            ));
        }

        match (user, file, title, year) {
            (Some(user), _, _, _) if !user.trim().is_empty() => Ok(Self::Watchlist {
                user: user.trim().to_string(),
            }),
            (Some(_), _, _, _) => Err(ScrapeError::config("username is empty")),
            (_, Some(path), _, _) => Ok(Self::Snapshot { path }),
            (_, _, Some(title), Some(year)) if !title.trim().is_empty() => Ok(Self::Manual {
                title: title.trim().to_string(),
                year,
            }),
            (_, _, Some(_), None) => Err(ScrapeError::config("a title (-t) needs a year (-y)")),
            (_, _, None, Some(_)) => Err(ScrapeError::config("a year (-y) needs a title (-t)")),
            (_, _, Some(_), Some(_)) => Err(ScrapeError::config("title is empty")),
            (None, None, None, None) => Err(ScrapeError::config(
                "provide a username (-u), a watchlist file (-f), or a title and year (-t/-y)",
            )),
        }
    }
}

/// Result of a whole run.
#[derive(Debug)]
pub struct RunReport {
    /// Number of entries that were processed
    pub entries: usize,
    /// Snapshot written or reused, if any
    pub snapshot: Option<PathBuf>,
    pub log: RunLog,
}

/// Lookup, selection and download for one entry. Cloned into each worker.
#[derive(Clone)]
struct EntryProcessor {
    index: IndexClient,
    downloader: Downloader,
    quality: QualityPreference,
    dry_run: bool,
}

impl EntryProcessor {
    async fn process(
        &self,
        index: usize,
        entry: &Entry,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> LogEntry {
        let label = entry.label();
        let _ = events.send(ScrapeEvent::EntryStarted {
            index,
            label: label.clone(),
        });

        let outcome = self.try_process(index, entry, &label, events).await;
        let log_entry = match outcome {
            Ok(DownloadOutcome::Downloaded { path, .. }) => LogEntry::Downloaded { label, path },
            Ok(DownloadOutcome::AlreadyPresent(path)) => LogEntry::Skipped {
                label,
                reason: SkipReason::AlreadyDownloaded(path),
            },
            Ok(DownloadOutcome::InLibrary(dir)) => LogEntry::Skipped {
                label,
                reason: SkipReason::InLibrary(dir),
            },
            Err(Outcome::Skip(reason)) => LogEntry::Skipped { label, reason },
            Err(Outcome::Fail(e)) => {
                log::debug!("{} failed ({}): {}", label, e.kind(), e);
                LogEntry::Failed {
                    label,
                    reason: e.to_string(),
                }
            }
        };

        let event = match &log_entry {
            LogEntry::Downloaded { label, path } => ScrapeEvent::EntryDownloaded {
                index,
                label: label.clone(),
                path: path.clone(),
            },
            LogEntry::Skipped { label, reason } => ScrapeEvent::EntrySkipped {
                index,
                label: label.clone(),
                reason: reason.to_string(),
            },
            LogEntry::Failed { label, reason } => ScrapeEvent::EntryFailed {
                index,
                label: label.clone(),
                reason: reason.clone(),
            },
        };
        let _ = events.send(event);
        log_entry
    }

    async fn try_process(
        &self,
        index: usize,
        entry: &Entry,
        label: &str,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> Result<DownloadOutcome, Outcome> {
        let year = entry.year.ok_or(Outcome::Fail(ScrapeError::UnknownYear))?;

        let _ = events.send(ScrapeEvent::EntryLookingUp {
            index,
            label: label.to_string(),
        });
        let candidates = self
            .index
            .lookup(&entry.name, year)
            .await
            .map_err(Outcome::Fail)?;

        let chosen = self
            .quality
            .select(&candidates)
            .ok_or(Outcome::Skip(SkipReason::NoSuitableQuality))?;
        match &chosen.size {
            Some(size) => log::debug!("{}: selected {} ({})", label, chosen.quality, size),
            None => log::debug!("{}: selected {}", label, chosen.quality),
        }

        if let Some(existing) = self.downloader.existing(entry).await {
            return Ok(existing);
        }
        if self.dry_run {
            return Err(Outcome::Skip(SkipReason::DryRun));
        }

        let _ = events.send(ScrapeEvent::EntryDownloading {
            index,
            label: label.to_string(),
        });
        self.downloader
            .download(entry, &chosen.resource_uri)
            .await
            .map_err(Outcome::Fail)
    }
}

/// Early exits from [`EntryProcessor::try_process`].
enum Outcome {
    Skip(SkipReason),
    Fail(ScrapeError),
}

pub struct Pipeline {
    site: LetterboxdSite,
    processor: EntryProcessor,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Result<Self, ScrapeError> {
        let client = Arc::new(HttpClient::new(&options.client)?);
        let site = LetterboxdSite::new(client.clone(), options.base_url.clone())
            .with_paging(options.page_size, options.max_pages, options.page_delay)
            .with_enrich_workers(options.enrich_workers);
        let processor = EntryProcessor {
            index: IndexClient::new(client.clone(), options.index_url.clone()),
            downloader: Downloader::new(client, options.output_dir.clone())
                .with_library_dir(options.library_dir.clone())
                .with_extension(options.extension.clone()),
            quality: options.quality.clone(),
            dry_run: options.dry_run,
        };
        Ok(Self {
            site,
            processor,
            options,
        })
    }

    /// Use a different page parser for listing and detail pages.
    pub fn with_layout(mut self, layout: Arc<dyn ListingLayout>) -> Self {
        self.site = self.site.with_layout(layout);
        self
    }

    /// Gather the run's entries. Returns them with the snapshot path used.
    pub async fn collect_entries(
        &self,
        source: &EntrySource,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> Result<(Vec<Entry>, Option<PathBuf>), ScrapeError> {
        match source {
            EntrySource::Watchlist { user } => self.collect_watchlist(user, Utc::now(), events).await,
            EntrySource::Snapshot { path } => {
                if !path.exists() {
                    return Err(ScrapeError::config(format!(
                        "file {} does not exist",
                        path.display()
                    )));
                }
                let entries = load_snapshot(path, events)?;
                let entries = self.site.enrich(entries, events).await;
                Ok((entries, Some(path.clone())))
            }
            EntrySource::Manual { title, year } => {
                log::info!("Searching for {} ({})", title, year);
                Ok((vec![Entry::manual(title.clone(), *year)], None))
            }
        }
    }

    /// Scrape `user`'s watchlist, or reuse this minute's snapshot if present.
    async fn collect_watchlist(
        &self,
        user: &str,
        at: DateTime<Utc>,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> Result<(Vec<Entry>, Option<PathBuf>), ScrapeError> {
        if !self.options.save_snapshot {
            return Ok((self.site.watchlist(user, events).await, None));
        }

        let path = self
            .options
            .snapshot_dir
            .join(snapshot_file_name(user, at));
        if path.exists() {
            log::info!("Snapshot {} already exists, skipping extraction", path.display());
            let entries = load_snapshot(&path, events)?;
            let entries = self.site.enrich(entries, events).await;
            return Ok((entries, Some(path)));
        }

        let entries = self.site.watchlist(user, events).await;
        if entries.is_empty() {
            log::info!("No movies to save.");
            return Ok((entries, None));
        }
        match save_snapshot(&path, &entries) {
            Ok(()) => {
                let _ = events.send(ScrapeEvent::SnapshotSaved {
                    path: path.clone(),
                    count: entries.len(),
                });
                Ok((entries, Some(path)))
            }
            Err(e) => {
                log::warn!("Could not save snapshot {}: {}", path.display(), e);
                Ok((entries, None))
            }
        }
    }

    /// Run every entry through lookup, selection and download.
    ///
    /// Results are funneled back to this task, which is the only writer of
    /// the returned log.
    pub async fn process_entries(
        &self,
        entries: Vec<Entry>,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> RunLog {
        let _ = events.send(ScrapeEvent::EntriesReady {
            total: entries.len(),
        });

        let processor = self.processor.clone();
        let worker_events = events.clone();
        let items: Vec<(usize, Entry)> = entries.into_iter().enumerate().collect();
        let mut pool = WorkerPool::start(self.options.workers, items, move |(index, entry)| {
            let processor = processor.clone();
            let events = worker_events.clone();
            async move { processor.process(index, &entry, &events).await }
        });

        log::debug!("Processing on {} workers", pool.worker_count());

        let mut log = RunLog::new();
        while let Some(result) = pool.recv().await {
            log.add(result);
        }

        let _ = events.send(ScrapeEvent::Done);
        log
    }

    /// Collect entries from `source`, then process them all.
    pub async fn run(
        &self,
        source: &EntrySource,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> Result<RunReport, ScrapeError> {
        let (entries, snapshot) = self.collect_entries(source, events).await?;
        let count = entries.len();
        let log = self.process_entries(entries, events).await;
        Ok(RunReport {
            entries: count,
            snapshot,
            log,
        })
    }
}

fn load_snapshot(
    path: &Path,
    events: &mpsc::UnboundedSender<ScrapeEvent>,
) -> Result<Vec<Entry>, ScrapeError> {
    let entries = read_snapshot(path)?;
    log::info!("Using watchlist file {} ({} entries)", path.display(), entries.len());
    let _ = events.send(ScrapeEvent::SnapshotLoaded {
        path: path.to_path_buf(),
        count: entries.len(),
    });
    Ok(entries)
}

fn save_snapshot(path: &Path, entries: &[Entry]) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_snapshot(path, entries)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
