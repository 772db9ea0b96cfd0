use std::sync::Arc;

use reelgrab_core::{Entry, ListingLayout};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::client::HttpClient;
use crate::enrich::enrich_years;
use crate::events::ScrapeEvent;
use crate::layout::{LetterboxdLayout, rated_page_url, watchlist_page_url};
use crate::paginate::{PaginationOptions, Paginator};
use crate::rated::RatedFilm;

/// Scrapes listings from a Letterboxd-style site.
pub struct LetterboxdSite {
    client: Arc<HttpClient>,
    layout: Arc<dyn ListingLayout>,
    base_url: String,
    /// Posters on a full watchlist page
    page_size: usize,
    max_pages: u32,
    page_delay: Duration,
    enrich_workers: usize,
}

impl LetterboxdSite {
    pub fn new(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            layout: Arc::new(LetterboxdLayout::new(base_url.clone())),
            base_url,
            page_size: 20,
            max_pages: 500,
            page_delay: Duration::from_secs(1),
            enrich_workers: 10,
        }
    }

    /// Replace the markup parser, e.g. after a site redesign.
    pub fn with_layout(mut self, layout: Arc<dyn ListingLayout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_paging(mut self, page_size: usize, max_pages: u32, page_delay: Duration) -> Self {
        self.page_size = page_size;
        self.max_pages = max_pages;
        self.page_delay = page_delay;
        self
    }

    pub fn with_enrich_workers(mut self, workers: usize) -> Self {
        self.enrich_workers = workers;
        self
    }

    fn paginator(&self, page_size: Option<usize>) -> Paginator<'_> {
        Paginator::new(
            &self.client,
            self.layout.as_ref(),
            PaginationOptions {
                page_size,
                max_pages: self.max_pages,
                page_delay: self.page_delay,
            },
        )
    }

    /// Every film on `user`'s watchlist, with release years resolved where
    /// possible.
    pub async fn watchlist(
        &self,
        user: &str,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> Vec<Entry> {
        log::info!("Scraping watchlist for {}", user);
        let listed = self
            .paginator(Some(self.page_size))
            .collect(|page| watchlist_page_url(&self.base_url, user, page), events)
            .await;

        let entries = listed.into_iter().map(|f| f.into_entry()).collect();
        self.enrich(entries, events).await
    }

    /// Resolve release years for entries that lack one, from their detail
    /// pages.
    pub async fn enrich(
        &self,
        entries: Vec<Entry>,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> Vec<Entry> {
        enrich_years(
            &self.client,
            self.layout.as_ref(),
            entries,
            self.enrich_workers,
            events,
        )
        .await
    }

    /// Films `user` rated exactly `rating` stars.
    ///
    /// This listing has no fixed page size, so only an empty page (or a
    /// failed fetch) ends it.
    pub async fn rated(
        &self,
        user: &str,
        rating: u8,
        events: &mpsc::UnboundedSender<ScrapeEvent>,
    ) -> Vec<RatedFilm> {
        log::info!("Scraping {}-star films for {}", rating, user);
        self.paginator(None)
            .collect(|page| rated_page_url(&self.base_url, user, rating, page), events)
            .await
            .into_iter()
            .filter_map(|film| RatedFilm::from_listed(film, rating))
            .collect()
    }
}
