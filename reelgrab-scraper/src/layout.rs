//! Letterboxd page structure.
//!
//! Everything that knows what Letterboxd markup looks like lives here, behind
//! [`ListingLayout`]. When the site changes its HTML, this is the only file
//! that should need touching.

use std::sync::LazyLock;

use reelgrab_core::{ListedFilm, ListingLayout, UNKNOWN};
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// One poster per film in a grid listing.
static POSTER: LazyLock<Selector> = LazyLock::new(|| selector("li.poster-container, li.griditem"));
static POSTER_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img[alt]"));
/// Element carrying the film's slug as a data attribute.
static POSTER_TARGET: LazyLock<Selector> =
    LazyLock::new(|| selector("[data-target-link], [data-item-link]"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static RATING: LazyLock<Selector> = LazyLock::new(|| selector("span.rating"));
/// On detail pages the release year links to the year's film archive.
static YEAR_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href*='/films/year/']"));

const STAR: char = '★';

/// Markup knowledge for letterboxd.com listing and detail pages.
#[derive(Debug, Clone)]
pub struct LetterboxdLayout {
    base_url: String,
}

impl LetterboxdLayout {
    /// `base_url` is used to turn relative film slugs into absolute links.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn absolute(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            format!("{}/{}", self.base_url, href)
        }
    }

    fn poster_name(poster: &ElementRef<'_>) -> String {
        poster
            .select(&POSTER_IMAGE)
            .next()
            .and_then(|img| img.value().attr("alt"))
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    }

    fn poster_link(&self, poster: &ElementRef<'_>) -> String {
        let target = poster.select(&POSTER_TARGET).next().and_then(|el| {
            el.value()
                .attr("data-target-link")
                .or_else(|| el.value().attr("data-item-link"))
        });
        let href = target.or_else(|| {
            poster
                .select(&ANCHOR)
                .next()
                .and_then(|a| a.value().attr("href"))
        });
        match href.map(str::trim).filter(|h| !h.is_empty()) {
            Some(h) => self.absolute(h),
            None => UNKNOWN.to_string(),
        }
    }

    fn poster_rating(poster: &ElementRef<'_>) -> Option<u8> {
        let text: String = poster.select(&RATING).next()?.text().collect();
        let stars = text.chars().filter(|&c| c == STAR).count();
        (stars > 0).then(|| stars.min(u8::MAX as usize) as u8)
    }
}

impl ListingLayout for LetterboxdLayout {
    fn parse_listing(&self, markup: &str) -> Vec<ListedFilm> {
        let doc = Html::parse_document(markup);
        doc.select(&POSTER)
            .map(|poster| ListedFilm {
                name: Self::poster_name(&poster),
                link: self.poster_link(&poster),
                rating: Self::poster_rating(&poster),
            })
            .collect()
    }

    fn parse_release_year(&self, markup: &str) -> Option<u16> {
        let doc = Html::parse_document(markup);
        doc.select(&YEAR_LINK).find_map(|a| {
            let text: String = a.text().collect();
            text.trim().parse().ok()
        })
    }
}

/// URL of one page of a user's watchlist.
pub fn watchlist_page_url(base_url: &str, user: &str, page: u32) -> String {
    format!(
        "{}/{}/watchlist/page/{}/",
        base_url.trim_end_matches('/'),
        user,
        page
    )
}

/// URL of one page of a user's films rated exactly `rating` stars.
pub fn rated_page_url(base_url: &str, user: &str, rating: u8, page: u32) -> String {
    format!(
        "{}/{}/films/rated/{}/page/{}/",
        base_url.trim_end_matches('/'),
        user,
        rating,
        page
    )
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
