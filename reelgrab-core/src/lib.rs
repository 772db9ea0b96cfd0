pub mod entry;
pub mod listing;
pub mod quality;

pub use entry::{Entry, MANUAL_SOURCE, UNKNOWN};
pub use listing::{ListedFilm, ListingLayout};
pub use quality::{Candidate, Quality, QualityParseError, QualityPreference};
