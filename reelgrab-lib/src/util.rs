use chrono::{DateTime, Utc};

/// Make a film label safe to use as a file name.
///
/// Path separators and control characters become `-`; everything else
/// (including spaces, colons and parentheses) is kept so the file name stays
/// recognizable. Leading dots are dropped to avoid hidden files.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    cleaned.trim().trim_start_matches('.').to_string()
}

/// Timestamp fragment used in output file names, e.g. `2024-05-01-13-37`.
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d-%H-%M").to_string()
}

/// `"1 movie"`, `"3 movies"`.
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
#[path = "tests/util_tests.rs"]
mod tests;
