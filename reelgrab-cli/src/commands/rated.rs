use std::path::PathBuf;
use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use reelgrab_lib::Settings;
use reelgrab_lib::async_util::run_with_events;
use reelgrab_lib::snapshot::write_csv;
use reelgrab_lib::util::pluralize;
use reelgrab_scraper::rated::{mutual_file_name, user_file_name};
use reelgrab_scraper::{
    HttpClient, LetterboxdSite, PipelineOptions, RatedFilm, ScrapeEvent, mutual_films,
};

use crate::error::CliError;
use crate::spinner::{PHASE_KEY, SpinnerPool};

/// Run the rated command.
pub(crate) fn run_rated(
    users: Vec<String>,
    rating: u8,
    output_dir: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let options = PipelineOptions::from_settings(&settings)?;
    let output_dir = output_dir.unwrap_or_else(|| options.snapshot_dir.clone());

    let client = Arc::new(HttpClient::new(&options.client)?);
    let site = LetterboxdSite::new(client, options.base_url.clone()).with_paging(
        options.page_size,
        options.max_pages,
        options.page_delay,
    );

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    let mut per_user: Vec<Vec<RatedFilm>> = Vec::with_capacity(users.len());

    for user in &users {
        let site = &site;
        log::info!(
            "Scraping {}-star films for {}",
            rating,
            user.if_supports_color(Stdout, |t| t.cyan()),
        );
        let films = rt.block_on(async {
            let mut pool = SpinnerPool::new(1, quiet);
            let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel::<ScrapeEvent>();
            let films = run_with_events(
                async move { site.rated(user, rating, &event_tx).await },
                event_rx,
                |e| match e {
                    ScrapeEvent::PageScraped { page, found } => {
                        pool.claim(PHASE_KEY, format!("Page {} ({} films)", page, found));
                    }
                    ScrapeEvent::PageFailed { page, reason } => {
                        log::warn!(
                            "  {} Stopped at page {}: {}",
                            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                            page,
                            reason,
                        );
                    }
                    _ => {}
                },
            )
            .await;
            pool.clear_all();
            films
        });
        log::info!(
            "  {} {} rated {} stars",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            pluralize(films.len(), "film"),
            rating,
        );
        per_user.push(films);
    }

    std::fs::create_dir_all(&output_dir)?;
    let now = chrono::Utc::now();

    if let [films] = per_user.as_slice() {
        let path = output_dir.join(user_file_name(&users[0], rating, now));
        write_csv(&path, films)?;
        log::info!(
            "{} {}-star films saved to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            rating,
            path.display(),
        );
        return Ok(());
    }

    let shared = mutual_films(&per_user);
    if shared.is_empty() {
        log::info!("No mutual {}-star films found.", rating);
        return Ok(());
    }

    log::info!("Found {} mutual {}-star films.", shared.len(), rating);
    let path = output_dir.join(mutual_file_name(&users, rating, now));
    write_csv(&path, &shared)?;
    log::info!(
        "{} Mutual {}-star films saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        rating,
        path.display(),
    );
    Ok(())
}
