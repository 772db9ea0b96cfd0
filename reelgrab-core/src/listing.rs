use crate::entry::Entry;

/// One poster scraped from a listing page.
///
/// `rating` is only present on rated-film listings and counts whole stars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFilm {
    pub name: String,
    pub link: String,
    pub rating: Option<u8>,
}

impl ListedFilm {
    /// Convert into a watchlist entry with an unresolved year.
    pub fn into_entry(self) -> Entry {
        Entry::new(self.name, self.link)
    }
}

/// Page-layout knowledge for a film site.
///
/// Implementors turn raw markup into structured data without touching the
/// network, so listing pages can be tested from saved snapshots. Both
/// methods must tolerate arbitrary input: markup that lacks the expected
/// structure yields an empty list or `None`, never a panic.
pub trait ListingLayout: Send + Sync {
    /// Extract every poster on a listing page, in page order.
    ///
    /// A poster missing its title or link keeps its place in the list with
    /// the missing field set to [`UNKNOWN`](crate::UNKNOWN).
    fn parse_listing(&self, markup: &str) -> Vec<ListedFilm>;

    /// Extract the release year from a film's detail page.
    fn parse_release_year(&self, markup: &str) -> Option<u16>;
}
