//! Torrent index lookups against a YTS-style `list_movies.json` API.

use std::sync::Arc;

use reelgrab_core::{Candidate, Quality};
use serde::Deserialize;

use crate::client::HttpClient;
use crate::error::ScrapeError;

/// Top-level `list_movies.json` response.
#[derive(Debug, Deserialize)]
pub struct ListMoviesResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub status_message: String,
    pub data: Option<ListMoviesData>,
}

#[derive(Debug, Deserialize)]
pub struct ListMoviesData {
    /// Absent when the query matched nothing.
    pub movies: Option<Vec<IndexMovie>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexMovie {
    pub title: String,
    pub year: u16,
    #[serde(default)]
    pub torrents: Vec<IndexTorrent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexTorrent {
    pub url: String,
    pub quality: String,
    pub size: Option<String>,
}

impl From<&IndexTorrent> for Candidate {
    fn from(t: &IndexTorrent) -> Self {
        Candidate {
            quality: Quality::from_label(&t.quality),
            resource_uri: t.url.clone(),
            size: t.size.clone(),
        }
    }
}

/// The movie whose title equals `title` ignoring case and whose year is
/// exactly `year`. A title match in a different year does not count.
pub fn find_exact<'a>(movies: &'a [IndexMovie], title: &str, year: u16) -> Option<&'a IndexMovie> {
    let wanted = title.to_lowercase();
    movies
        .iter()
        .find(|m| m.year == year && m.title.to_lowercase() == wanted)
}

/// Client for the torrent index.
#[derive(Clone)]
pub struct IndexClient {
    client: Arc<HttpClient>,
    api_url: String,
}

impl IndexClient {
    pub fn new(client: Arc<HttpClient>, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Candidates for the exact `(title, year)` match.
    ///
    /// Returns [`ScrapeError::NotFound`] when the index has no exact match,
    /// including when it returns no movies at all.
    pub async fn lookup(&self, title: &str, year: u16) -> Result<Vec<Candidate>, ScrapeError> {
        let url = format!("{}/list_movies.json", self.api_url);
        let response: ListMoviesResponse = self
            .client
            .get_json(&url, &[("query_term", title)])
            .await?;

        if !response.status.is_empty() && response.status != "ok" {
            log::debug!(
                "Index returned status {:?} for {}: {}",
                response.status,
                title,
                response.status_message
            );
        }

        let movies = response
            .data
            .and_then(|d| d.movies)
            .unwrap_or_default();

        let movie = find_exact(&movies, title, year).ok_or_else(|| ScrapeError::NotFound {
            title: title.to_string(),
            year,
        })?;

        log::debug!(
            "Index match for {} ({}): {} torrents",
            title,
            year,
            movie.torrents.len()
        );
        Ok(movie.torrents.iter().map(Candidate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::fixtures;
    use mockito::Matcher;

    fn movie(title: &str, year: u16) -> IndexMovie {
        IndexMovie {
            title: title.to_string(),
            year,
            torrents: Vec::new(),
        }
    }

    #[test]
    fn exact_match_ignores_case_but_not_year() {
        let movies = vec![movie("Dune", 1984), movie("DUNE", 2021)];
        assert_eq!(find_exact(&movies, "dune", 2021).map(|m| m.year), Some(2021));
        assert!(find_exact(&movies, "Dune", 2020).is_none());
        assert!(find_exact(&movies, "Dune: Part Two", 2021).is_none());
    }

    async fn index_for(server: &mockito::ServerGuard) -> IndexClient {
        let client = Arc::new(HttpClient::new(&ClientConfig::default()).unwrap());
        IndexClient::new(client, format!("{}/api/v2/", server.url()))
    }

    #[tokio::test]
    async fn lookup_returns_candidates_for_exact_match() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/api/v2/list_movies.json")
            .match_query(Matcher::UrlEncoded("query_term".into(), "Dune".into()))
            .with_body(fixtures::index_response(&[
                ("Dune", 1984, &[("1080p", "http://t/dune-1984.torrent")]),
                (
                    "Dune",
                    2021,
                    &[
                        ("720p", "http://t/dune-720.torrent"),
                        ("2160p", "http://t/dune-2160.torrent"),
                    ],
                ),
            ]))
            .expect(2)
            .create_async()
            .await;

        let index = index_for(&server).await;
        let found = index.lookup("Dune", 2021).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].quality, Quality::Uhd2160);
        assert_eq!(found[1].resource_uri, "http://t/dune-2160.torrent");
        assert_eq!(found[1].size.as_deref(), Some("1.9 GB"));

        let err = index.lookup("Dune", 2020).await.unwrap_err();
        assert_eq!(err.kind(), "no-match");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn missing_movies_key_is_no_match() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v2/list_movies.json")
            .match_query(Matcher::Any)
            .with_body(r#"{"status":"ok","status_message":"Query was successful","data":{"movie_count":0,"limit":20,"page_number":1}}"#)
            .create_async()
            .await;

        let err = index_for(&server).await.lookup("Nothing", 1999).await.unwrap_err();
        assert!(matches!(err, ScrapeError::NotFound { year: 1999, .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v2/list_movies.json")
            .match_query(Matcher::Any)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = index_for(&server).await.lookup("Heat", 1995).await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
