//! Films a user rated at a given star level, and films several users share.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use reelgrab_core::ListedFilm;
use reelgrab_lib::util::file_stamp;
use serde::Serialize;

/// One row of a per-user rated-films file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatedFilm {
    pub title: String,
    pub link: String,
    pub rating: u8,
}

impl RatedFilm {
    /// Keep `film` only if it is rated exactly `rating` stars.
    pub fn from_listed(film: ListedFilm, rating: u8) -> Option<Self> {
        (film.rating == Some(rating)).then(|| Self {
            title: film.name,
            link: film.link,
            rating,
        })
    }
}

/// One row of a mutual-films file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MutualFilm {
    pub title: String,
    pub rating: u8,
}

/// Films (by exact title and rating) that appear in every user's list.
///
/// Sorted by title. Fewer than two lists yields nothing to compare.
pub fn mutual_films(lists: &[Vec<RatedFilm>]) -> Vec<MutualFilm> {
    let [first, rest @ ..] = lists else {
        return Vec::new();
    };
    if rest.is_empty() {
        return Vec::new();
    }

    let key = |f: &RatedFilm| MutualFilm {
        title: f.title.clone(),
        rating: f.rating,
    };
    let mut shared: BTreeSet<MutualFilm> = first.iter().map(key).collect();
    for list in rest {
        let other: BTreeSet<MutualFilm> = list.iter().map(key).collect();
        shared.retain(|f| other.contains(f));
    }
    shared.into_iter().collect()
}

/// `user_5_star_films-alice-2024-05-01-13-37-utc.csv`
pub fn user_file_name(user: &str, rating: u8, at: DateTime<Utc>) -> String {
    format!("user_{}_star_films-{}-{}-utc.csv", rating, user, file_stamp(at))
}

/// `mutual_5_star_films_alice_bob_2024-05-01-13-37-utc.csv`
pub fn mutual_file_name(users: &[String], rating: u8, at: DateTime<Utc>) -> String {
    format!(
        "mutual_{}_star_films_{}_{}-utc.csv",
        rating,
        users.join("_"),
        file_stamp(at)
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn rated(title: &str) -> RatedFilm {
        RatedFilm {
            title: title.to_string(),
            link: format!("https://letterboxd.com/film/{}/", title.to_lowercase()),
            rating: 5,
        }
    }

    #[test]
    fn keeps_only_exact_rating() {
        let film = |rating| ListedFilm {
            name: "Heat".into(),
            link: "https://letterboxd.com/film/heat-1995/".into(),
            rating,
        };
        assert!(RatedFilm::from_listed(film(Some(5)), 5).is_some());
        assert!(RatedFilm::from_listed(film(Some(4)), 5).is_none());
        assert!(RatedFilm::from_listed(film(None), 5).is_none());
    }

    #[test]
    fn mutual_is_intersection_across_all_users() {
        let alice = vec![rated("Heat"), rated("Alien"), rated("Brazil")];
        let bob = vec![rated("Brazil"), rated("Heat"), rated("Ran")];
        let carol = vec![rated("Heat"), rated("Brazil"), rated("alien")];

        let titles: Vec<String> = mutual_films(&[alice.clone(), bob, carol])
            .into_iter()
            .map(|f| f.title)
            .collect();
        assert_eq!(titles, vec!["Brazil", "Heat"]);

        assert!(mutual_films(&[alice]).is_empty());
        assert!(mutual_films(&[]).is_empty());
    }

    #[test]
    fn titles_compare_case_sensitively() {
        let shared = mutual_films(&[vec![rated("Alien")], vec![rated("alien")]]);
        assert!(shared.is_empty());
    }

    #[test]
    fn file_names() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 13, 37, 0).unwrap();
        assert_eq!(
            user_file_name("alice", 5, at),
            "user_5_star_films-alice-2024-05-01-13-37-utc.csv"
        );
        assert_eq!(
            mutual_file_name(&["alice".into(), "bob".into()], 5, at),
            "mutual_5_star_films_alice_bob_2024-05-01-13-37-utc.csv"
        );
    }
}
