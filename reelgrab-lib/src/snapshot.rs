//! CSV snapshots of scraped watchlists, and generic CSV output.
//!
//! A snapshot has the header `Name,Year,Letterboxd URI`, one row per entry.
//! Reading is lenient about extra columns and accepts a few alternative
//! header spellings, so a watchlist export downloaded from Letterboxd
//! itself (which adds a `Date` column) loads as-is.

use std::path::Path;

use chrono::{DateTime, Utc};
use reelgrab_core::{Entry, UNKNOWN};
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::util::file_stamp;

pub const SNAPSHOT_HEADER: [&str; 3] = ["Name", "Year", "Letterboxd URI"];

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "Name", alias = "name", alias = "title")]
    name: String,
    #[serde(rename = "Year", alias = "year")]
    year: String,
    #[serde(rename = "Letterboxd URI", alias = "uri", alias = "link")]
    uri: String,
}

/// File name for a user's snapshot taken at `at`, e.g.
/// `watchlist-alice-2024-05-01-13-37-utc.csv`.
pub fn snapshot_file_name(user: &str, at: DateTime<Utc>) -> String {
    format!("watchlist-{}-{}-utc.csv", user, file_stamp(at))
}

/// Write entries to `path`, replacing any existing file.
///
/// Unknown years are written as an empty field.
pub fn write_snapshot(path: &Path, entries: &[Entry]) -> Result<(), SnapshotError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(SNAPSHOT_HEADER)?;
    for entry in entries {
        writer.serialize(SnapshotRow {
            name: entry.name.clone(),
            year: entry.year.map(|y| y.to_string()).unwrap_or_default(),
            uri: entry.source_uri.clone(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Read entries back from a snapshot.
///
/// An empty year or the literal `Unknown` loads as an unresolved year; any
/// other non-numeric year is an error naming the offending line.
pub fn read_snapshot(path: &Path) -> Result<Vec<Entry>, SnapshotError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut entries = Vec::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: SnapshotRow = record.deserialize(Some(&headers))?;
        let year = parse_year(&row.year).ok_or_else(|| SnapshotError::InvalidYear {
            line,
            value: row.year.clone(),
        })?;
        entries.push(Entry::new(row.name, row.uri).with_year(year));
    }

    Ok(entries)
}

/// `Some(None)` for an unknown year, `None` for garbage.
fn parse_year(raw: &str) -> Option<Option<u16>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN) {
        return Some(None);
    }
    trimmed.parse().ok().map(Some)
}

/// Write any serializable rows to `path` with a header derived from `T`.
///
/// An empty slice produces an empty file, since the header comes from the
/// first row.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), SnapshotError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/snapshot_tests.rs"]
mod tests;
