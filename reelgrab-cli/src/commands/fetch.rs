use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use reelgrab_lib::Settings;
use reelgrab_lib::async_util::run_with_events;
use reelgrab_lib::util::pluralize;
use reelgrab_scraper::{
    EntrySource, LogEntry, Pipeline, PipelineOptions, RunLog, ScrapeEvent,
};

use crate::cli_types::FetchArgs;
use crate::error::CliError;
use crate::spinner::{PHASE_KEY, SpinnerPool};

/// Layer command-line flags over the loaded settings.
pub(crate) fn apply_flags(settings: &mut Settings, args: &FetchArgs) {
    if let Some(dir) = &args.output_dir {
        settings.download.output_dir = dir.clone();
    }
    if let Some(dir) = &args.library_dir {
        settings.download.library_dir = Some(dir.clone());
    }
    if let Some(quality) = &args.quality {
        settings.download.quality = quality.clone();
    }
    if let Some(threads) = args.threads {
        settings.download.workers = threads;
    }
}

/// Run the fetch command.
pub(crate) fn run_fetch(args: FetchArgs, quiet: bool) -> Result<(), CliError> {
    let source = EntrySource::from_args(
        args.source.user.clone(),
        args.source.file.clone(),
        args.source.title.clone(),
        args.source.year,
    )?;

    let mut settings = Settings::load()?;
    apply_flags(&mut settings, &args);
    let mut options = PipelineOptions::from_settings(&settings)?;
    options.dry_run = args.dry_run;
    options.save_snapshot = !args.no_snapshot;

    log::info!(
        "Saving torrents to: {}",
        options.output_dir.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "{}",
        format!("Quality: {}", options.quality).if_supports_color(Stdout, |t| t.dimmed()),
    );
    if let Some(dir) = &options.library_dir {
        log::info!(
            "{}",
            format!("Library: {}", dir.display()).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if options.dry_run {
        log::info!(
            "{}",
            "Dry run: no files will be downloaded".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let workers = options.workers;
    let pipeline = Pipeline::new(options)?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    let report = rt.block_on(async {
        let mut pool = SpinnerPool::new(workers, quiet);
        let mut total = 0usize;
        let mut resolved = 0usize;
        let mut to_resolve = 0usize;

        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel::<ScrapeEvent>();
        let result = run_with_events(
            async move { pipeline.run(&source, &event_tx).await },
            event_rx,
            |e| match e {
                ScrapeEvent::PageScraped { page, found } => {
                    pool.claim(
                        PHASE_KEY,
                        format!("Scraping watchlist: page {} ({} films)", page, found),
                    );
                }
                ScrapeEvent::PageFailed { page, reason } => {
                    pool.release(PHASE_KEY);
                    log::warn!(
                        "  {} Stopped at page {}: {}",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        page,
                        reason,
                    );
                }
                ScrapeEvent::ListingComplete { total } => {
                    pool.release(PHASE_KEY);
                    pool.println(format!(
                        "{} Found {} on the watchlist",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        pluralize(total, "movie"),
                    ));
                }
                ScrapeEvent::EnrichStarted { total } => {
                    to_resolve = total;
                    if total > 0 {
                        pool.claim(PHASE_KEY, format!("Resolving release years (0/{})", total));
                    }
                }
                ScrapeEvent::YearResolved { name, year, .. } => {
                    resolved += 1;
                    pool.update(
                        PHASE_KEY,
                        format!("Resolving release years ({}/{})", resolved, to_resolve),
                    );
                    if year.is_none() {
                        log::debug!("No release year for {}", name);
                    }
                }
                ScrapeEvent::SnapshotLoaded { path, count } => {
                    pool.println(format!(
                        "{} Using watchlist file {} ({})",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        path.display(),
                        pluralize(count, "movie"),
                    ));
                }
                ScrapeEvent::SnapshotSaved { path, count } => {
                    pool.release(PHASE_KEY);
                    pool.println(format!(
                        "{} Saved {} to {}",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        pluralize(count, "movie"),
                        path.display(),
                    ));
                }
                ScrapeEvent::EntriesReady { total: n } => {
                    pool.release(PHASE_KEY);
                    total = n;
                }
                ScrapeEvent::EntryStarted { index, label } => {
                    pool.claim(index, format!("[{}/{}] {}", index + 1, total, label));
                }
                ScrapeEvent::EntryLookingUp { index, label } => {
                    pool.update(index, format!("[{}/{}] Looking up {}", index + 1, total, label));
                }
                ScrapeEvent::EntryDownloading { index, label } => {
                    pool.update(index, format!("[{}/{}] Downloading {}", index + 1, total, label));
                }
                ScrapeEvent::EntryDownloaded { index, .. }
                | ScrapeEvent::EntrySkipped { index, .. }
                | ScrapeEvent::EntryFailed { index, .. } => {
                    pool.release(index);
                }
                ScrapeEvent::Done => {}
            },
        )
        .await;

        pool.clear_all();
        result
    })?;

    if let Some(path) = &report.snapshot {
        log::debug!("Snapshot: {}", path.display());
    }
    print_summary(&report.log);

    if let Some(path) = &args.log_summary {
        write_summary_file(&report.log, path);
    }
    Ok(())
}

fn write_summary_file(log: &RunLog, path: &Path) {
    match log.write_to_file(path) {
        Ok(()) => log::info!("Summary written to {}", path.display()),
        Err(e) => log::warn!("Warning: could not write summary to {}: {}", path.display(), e),
    }
}

/// One of the three outcome lists printed at the end of a run.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Bucket {
    Downloaded,
    Skipped,
    Failed,
}

impl Bucket {
    /// Heading for the list, e.g. `Downloaded 2 movies:`.
    pub(crate) fn heading(self, count: usize) -> String {
        let (verb, none) = match self {
            Self::Downloaded => ("Downloaded", "No movies were downloaded."),
            Self::Skipped => ("Skipped", "No movies were skipped."),
            Self::Failed => ("Failed", "No movies failed."),
        };
        if count == 0 {
            none.to_string()
        } else {
            format!("{} {}:", verb, pluralize(count, "movie"))
        }
    }
}

fn print_summary(log: &RunLog) {
    let downloaded: Vec<&LogEntry> = log.downloaded().collect();
    let skipped: Vec<&LogEntry> = log.skipped().collect();
    let failed: Vec<&LogEntry> = log.failed().collect();

    log::info!("");
    log::info!("{}", "-----------------------------------------".if_supports_color(Stdout, |t| t.dimmed()));
    log::info!("{}", " Processing Complete".if_supports_color(Stdout, |t| t.bold()));
    log::info!("{}", "-----------------------------------------".if_supports_color(Stdout, |t| t.dimmed()));
    log::info!("");

    log::info!(
        "{} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        Bucket::Downloaded.heading(downloaded.len()),
    );
    for entry in &downloaded {
        log::info!("  - {}", entry.label());
    }
    log::info!("");

    log::info!(
        "{} {}",
        "-".if_supports_color(Stdout, |t| t.cyan()),
        Bucket::Skipped.heading(skipped.len()),
    );
    for entry in &skipped {
        if let LogEntry::Skipped { label, reason } = entry {
            log::info!("  - {} - {}", label, reason);
        }
    }
    log::info!("");

    let heading = Bucket::Failed.heading(failed.len());
    if failed.is_empty() {
        log::info!("{} {}", "\u{2718}".if_supports_color(Stdout, |t| t.dimmed()), heading);
    } else {
        log::warn!("{} {}", "\u{2718}".if_supports_color(Stdout, |t| t.red()), heading);
    }
    for entry in &failed {
        if let LogEntry::Failed { label, reason } = entry {
            log::warn!("  - {} - Error: {}", label, reason);
        }
    }
}
