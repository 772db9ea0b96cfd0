use super::*;

use chrono::TimeZone;

#[test]
fn test_sanitize_keeps_ordinary_titles() {
    assert_eq!(
        sanitize_file_name("Mission: Impossible (1996)"),
        "Mission: Impossible (1996)"
    );
}

#[test]
fn test_sanitize_replaces_separators() {
    assert_eq!(sanitize_file_name("AC/DC: Live (1992)"), "AC-DC: Live (1992)");
    assert_eq!(sanitize_file_name("a\\b\tc"), "a-b-c");
}

#[test]
fn test_sanitize_strips_leading_dots() {
    assert_eq!(sanitize_file_name("..hidden"), "hidden");
}

#[test]
fn test_file_stamp() {
    let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 5, 0).unwrap();
    assert_eq!(file_stamp(at), "2023-12-31-23-05");
}

#[test]
fn test_pluralize() {
    assert_eq!(pluralize(0, "movie"), "0 movies");
    assert_eq!(pluralize(1, "movie"), "1 movie");
    assert_eq!(pluralize(7, "movie"), "7 movies");
}
