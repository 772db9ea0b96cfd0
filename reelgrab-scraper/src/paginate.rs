use reelgrab_core::{ListedFilm, ListingLayout};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::client::HttpClient;
use crate::events::ScrapeEvent;

/// What to do after reading one listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// The page was full; there may be more.
    Continue,
    /// Empty or short page: this was the last one.
    Stop,
}

/// Decide whether to fetch another page after finding `found` posters.
///
/// With no `page_size`, only an empty page ends the listing.
pub fn next_step(found: usize, page_size: Option<usize>) -> PageStep {
    match page_size {
        _ if found == 0 => PageStep::Stop,
        Some(size) if found < size => PageStep::Stop,
        _ => PageStep::Continue,
    }
}

#[derive(Debug, Clone)]
pub struct PaginationOptions {
    /// Posters on a full page; `None` to stop only on an empty page
    pub page_size: Option<usize>,
    /// Hard cap on pages fetched, in case a site never returns a short page
    pub max_pages: u32,
    /// Pause before each page after the first
    pub page_delay: Duration,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: Some(20),
            max_pages: 500,
            page_delay: Duration::from_secs(1),
        }
    }
}

/// Walks a paged listing one page at a time.
///
/// Pages are strictly sequential: whether page N+1 exists is only known
/// after page N has been read.
pub struct Paginator<'a> {
    client: &'a HttpClient,
    layout: &'a dyn ListingLayout,
    options: PaginationOptions,
}

impl<'a> Paginator<'a> {
    pub fn new(
        client: &'a HttpClient,
        layout: &'a dyn ListingLayout,
        options: PaginationOptions,
    ) -> Self {
        Self {
            client,
            layout,
            options,
        }
    }

    /// Read pages `1, 2, ...` (URLs from `page_url`) and return every poster.
    ///
    /// A page that fails to fetch is treated like an empty page: pagination
    /// stops and whatever was gathered so far is returned.
    pub async fn collect(
        &self,
        page_url: impl Fn(u32) -> String,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> Vec<ListedFilm> {
        let mut films = Vec::new();

        for page in 1..=self.options.max_pages {
            if page > 1 && !self.options.page_delay.is_zero() {
                tokio::time::sleep(self.options.page_delay).await;
            }

            let url = page_url(page);
            let markup = match self.client.get_page(&url).await {
                Ok(markup) => markup,
                Err(e) => {
                    log::warn!("Stopping at page {}: {}", page, e);
                    let _ = events.send(ScrapeEvent::PageFailed {
                        page,
                        reason: e.to_string(),
                    });
                    break;
                }
            };

            let found = self.layout.parse_listing(&markup);
            let count = found.len();
            log::debug!("Page {}: {} posters", page, count);
            let _ = events.send(ScrapeEvent::PageScraped { page, found: count });
            films.extend(found);

            if next_step(count, self.options.page_size) == PageStep::Stop {
                break;
            }
            if page == self.options.max_pages {
                log::warn!(
                    "Reached the {}-page limit; the listing may be incomplete",
                    self.options.max_pages
                );
            }
        }

        let _ = events.send(ScrapeEvent::ListingComplete { total: films.len() });
        films
    }
}

#[cfg(test)]
#[path = "tests/paginate_tests.rs"]
mod tests;
