use super::*;

use chrono::TimeZone;

fn sample_entries() -> Vec<Entry> {
    vec![
        Entry::new("Dune", "https://letterboxd.com/film/dune-2021/").with_year(Some(2021)),
        Entry::new("Paris, Texas", "https://letterboxd.com/film/paris-texas/")
            .with_year(Some(1984)),
        Entry::new("Untitled Project", "https://letterboxd.com/film/untitled/"),
    ]
}

#[test]
fn test_snapshot_file_name() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 13, 37, 59).unwrap();
    assert_eq!(
        snapshot_file_name("alice", at),
        "watchlist-alice-2024-05-01-13-37-utc.csv"
    );
}

#[test]
fn test_write_then_read_preserves_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snap.csv");
    let entries = sample_entries();

    write_snapshot(&path, &entries).unwrap();
    let loaded = read_snapshot(&path).unwrap();

    assert_eq!(loaded, entries);
}

#[test]
fn test_written_header_and_quoting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snap.csv");
    write_snapshot(&path, &sample_entries()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Name,Year,Letterboxd URI"));
    assert_eq!(
        lines.next(),
        Some("Dune,2021,https://letterboxd.com/film/dune-2021/")
    );
    assert_eq!(
        lines.next(),
        Some("\"Paris, Texas\",1984,https://letterboxd.com/film/paris-texas/")
    );
    assert_eq!(
        lines.next(),
        Some("Untitled Project,,https://letterboxd.com/film/untitled/")
    );
}

#[test]
fn test_empty_snapshot_still_has_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    write_snapshot(&path, &[]).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap().trim(),
        "Name,Year,Letterboxd URI"
    );
    assert!(read_snapshot(&path).unwrap().is_empty());
}

#[test]
fn test_reads_letterboxd_export_with_extra_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    std::fs::write(
        &path,
        "Date,Name,Year,Letterboxd URI\n2023-01-02,Heat,1995,https://boxd.it/2bDa\n",
    )
    .unwrap();

    let loaded = read_snapshot(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Heat");
    assert_eq!(loaded[0].year, Some(1995));
    assert_eq!(loaded[0].source_uri, "https://boxd.it/2bDa");
}

#[test]
fn test_unknown_year_sentinel_reads_as_unresolved() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.csv");
    std::fs::write(&path, "Name,Year,Letterboxd URI\nAlien,Unknown,/film/alien/\n").unwrap();

    let loaded = read_snapshot(&path).unwrap();
    assert_eq!(loaded[0].year, None);
}

#[test]
fn test_garbage_year_names_the_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(
        &path,
        "Name,Year,Letterboxd URI\nAlien,1979,/film/alien/\nAliens,eighty-six,/film/aliens/\n",
    )
    .unwrap();

    match read_snapshot(&path) {
        Err(SnapshotError::InvalidYear { line, value }) => {
            assert_eq!(line, 3);
            assert_eq!(value, "eighty-six");
        }
        other => panic!("expected InvalidYear, got {other:?}"),
    }
}

#[test]
fn test_missing_year_column_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noyear.csv");
    std::fs::write(&path, "Name,Letterboxd URI\nAlien,/film/alien/\n").unwrap();
    assert!(matches!(read_snapshot(&path), Err(SnapshotError::Csv(_))));
}

#[test]
fn test_write_csv_derives_header() {
    #[derive(Serialize)]
    struct Row<'a> {
        title: &'a str,
        rating: u8,
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.csv");
    write_csv(&path, &[Row { title: "Heat", rating: 5 }]).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "title,rating\nHeat,5\n"
    );
}
