use std::path::{Path, PathBuf};

use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::time::Duration;

use crate::error::ScrapeError;

/// Connection settings shared by every request.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Whole-request timeout for pages and API calls
    pub request_timeout: Duration,
    /// Connect and per-read timeout for file downloads
    pub download_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            request_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for listing pages, the index API, and file downloads.
///
/// Every call makes exactly one request with no retries. Failures come back
/// as typed [`ScrapeError`]s; callers decide whether a failure ends
/// pagination or marks a single entry as failed.
pub struct HttpClient {
    http: reqwest::Client,
    /// Downloads can be large, so they get no whole-request timeout
    download_http: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout)
            .build()?;
        let download_http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.download_timeout)
            .read_timeout(config.download_timeout)
            .build()?;
        Ok(Self {
            http,
            download_http,
        })
    }

    /// Fetch a page and return its body as text.
    pub async fn get_page(&self, url: &str) -> Result<String, ScrapeError> {
        log::debug!("GET {}", url);
        let resp = check_status(self.http.get(url).send().await?, url)?;
        Ok(resp.text().await?)
    }

    /// Fetch `url` with query parameters and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ScrapeError> {
        log::debug!("GET {} {:?}", url, query);
        let resp = check_status(self.http.get(url).query(query).send().await?, url)?;
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ScrapeError::Decode(format!(
                "{e}. Response: {}",
                text.chars().take(200).collect::<String>()
            ))
        })
    }

    /// Stream `url` into `dest`, returning the number of bytes written.
    ///
    /// The body is written chunk by chunk to `<dest>.part` and renamed into
    /// place once complete. On any failure the partial file is removed, so
    /// `dest` either holds the whole body or does not exist.
    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64, ScrapeError> {
        log::debug!("Downloading {} -> {}", url, dest.display());
        let resp = check_status(self.download_http.get(url).send().await?, url)?;
        let part = part_path(dest);

        match stream_body(resp, &part).await {
            Ok(written) => {
                tokio::fs::rename(&part, dest).await?;
                Ok(written)
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&part).await {
                    log::debug!("Could not remove {}: {}", part.display(), rm);
                }
                Err(e)
            }
        }
    }
}

async fn stream_body(resp: reqwest::Response, part: &Path) -> Result<u64, ScrapeError> {
    let mut file = tokio::fs::File::create(part).await?;
    let mut stream = resp.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

fn check_status(resp: reqwest::Response, url: &str) -> Result<reqwest::Response, ScrapeError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ScrapeError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// Temporary path used while a download is in flight.
pub(crate) fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
