//! Fill in release years from each film's detail page.
//!
//! Listing pages carry only a title and a link, so the year needs one extra
//! request per film. These requests are independent and run concurrently.

use std::future::Future;

use futures::stream::{self, StreamExt};
use reelgrab_core::{Entry, ListingLayout, UNKNOWN};
use tokio::sync::mpsc;

use crate::client::HttpClient;
use crate::events::ScrapeEvent;

/// Whether `entry` needs a detail-page fetch to learn its year.
fn needs_lookup(entry: &Entry) -> bool {
    entry.year.is_none()
        && entry.source_uri != UNKNOWN
        && (entry.source_uri.starts_with("http://") || entry.source_uri.starts_with("https://"))
}

async fn resolve_year(client: &HttpClient, layout: &dyn ListingLayout, uri: &str) -> Option<u16> {
    match client.get_page(uri).await {
        Ok(markup) => {
            let year = layout.parse_release_year(&markup);
            if year.is_none() {
                log::debug!("No release year on {}", uri);
            }
            year
        }
        Err(e) => {
            log::warn!("Could not fetch details from {}: {}", uri, e);
            None
        }
    }
}

/// Resolve missing years for `entries`, at most `workers` requests at once.
///
/// The returned list is in the same order as the input. Entries that
/// already have a year or lack a usable link are passed through untouched,
/// and a failed lookup leaves the year unknown rather than failing the run.
pub async fn enrich_years(
    client: &HttpClient,
    layout: &dyn ListingLayout,
    entries: Vec<Entry>,
    workers: usize,
    events: &mpsc::UnboundedSender<ScrapeEvent>,
) -> Vec<Entry> {
    fill_years(entries, workers, events, |uri| async move {
        resolve_year(client, layout, &uri).await
    })
    .await
}

/// Run `resolve` on the detail link of each entry that needs a year, with at
/// most `workers` calls in flight.
async fn fill_years<F, Fut>(
    entries: Vec<Entry>,
    workers: usize,
    events: &mpsc::UnboundedSender<ScrapeEvent>,
    resolve: F,
) -> Vec<Entry>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<u16>>,
{
    let pending = entries.iter().filter(|e| needs_lookup(e)).count();
    let _ = events.send(ScrapeEvent::EnrichStarted { total: pending });

    stream::iter(entries.into_iter().enumerate())
        .map(|(index, entry)| {
            let events = events.clone();
            let lookup = needs_lookup(&entry).then(|| resolve(entry.source_uri.clone()));
            async move {
                let Some(lookup) = lookup else {
                    return entry;
                };
                let year = lookup.await;
                let _ = events.send(ScrapeEvent::YearResolved {
                    index,
                    name: entry.name.clone(),
                    year,
                });
                entry.with_year(year)
            }
        })
        .buffered(workers.max(1))
        .collect()
        .await
}
