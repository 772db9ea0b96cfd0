use serde::{Deserialize, Serialize};

/// Sentinel used when a scraped field is missing from the page.
pub const UNKNOWN: &str = "Unknown";

/// Source URI recorded for entries typed in by hand.
pub const MANUAL_SOURCE: &str = "Manual Search";

/// One watchlist item: a film title, its release year, and the page it came from.
///
/// The year starts out unresolved for freshly scraped entries and is filled
/// in once by enrichment. Entries loaded from a snapshot or typed in by hand
/// carry their year from the start.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub year: Option<u16>,
    pub source_uri: String,
}

impl Entry {
    /// Create an entry with no year yet. An empty name becomes [`UNKNOWN`].
    pub fn new(name: impl Into<String>, source_uri: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            UNKNOWN.to_string()
        } else {
            name
        };
        Self {
            name,
            year: None,
            source_uri: source_uri.into(),
        }
    }

    /// An entry built from a title and year given on the command line.
    pub fn manual(name: impl Into<String>, year: u16) -> Self {
        Self::new(name, MANUAL_SOURCE).with_year(Some(year))
    }

    /// Return this entry with its year resolved.
    ///
    /// A year that is already known is never replaced.
    pub fn with_year(mut self, year: Option<u16>) -> Self {
        if self.year.is_none() {
            self.year = year;
        }
        self
    }

    /// Human-readable label, e.g. `Dune (2021)` or `Dune (Unknown)`.
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.name, year),
            None => format!("{} ({})", self.name, UNKNOWN),
        }
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_becomes_unknown() {
        let entry = Entry::new("   ", "https://letterboxd.com/film/x/");
        assert_eq!(entry.name, UNKNOWN);
    }

    #[test]
    fn resolved_year_is_not_replaced() {
        let entry = Entry::manual("Dune", 2021).with_year(Some(1984));
        assert_eq!(entry.year, Some(2021));
    }

    #[test]
    fn unresolved_year_is_filled_once() {
        let entry = Entry::new("Alien", "/film/alien/").with_year(Some(1979));
        assert_eq!(entry.year, Some(1979));
        assert_eq!(entry.label(), "Alien (1979)");
    }

    #[test]
    fn label_for_unknown_year() {
        let entry = Entry::new("Alien", "/film/alien/");
        assert_eq!(entry.to_string(), "Alien (Unknown)");
    }

    #[test]
    fn manual_entry_source() {
        let entry = Entry::manual("Heat", 1995);
        assert_eq!(entry.source_uri, MANUAL_SOURCE);
    }
}
