use std::path::PathBuf;
use std::sync::Arc;

use reelgrab_core::Entry;
use reelgrab_lib::util::sanitize_file_name;

use crate::client::HttpClient;
use crate::error::ScrapeError;

/// What happened when an entry's file was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    /// The target file was already in the output directory.
    AlreadyPresent(PathBuf),
    /// A library folder with this name already exists.
    InLibrary(String),
}

/// Saves selected files into the output directory.
#[derive(Clone)]
pub struct Downloader {
    client: Arc<HttpClient>,
    output_dir: PathBuf,
    library_dir: Option<PathBuf>,
    extension: String,
}

impl Downloader {
    pub fn new(client: Arc<HttpClient>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
            library_dir: None,
            extension: "torrent".to_string(),
        }
    }

    /// Also skip entries whose title matches a folder in `dir`.
    pub fn with_library_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.library_dir = dir;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// `"{name} ({year}).torrent"` inside the output directory.
    pub fn target_path(&self, entry: &Entry) -> PathBuf {
        let name = sanitize_file_name(&entry.label());
        self.output_dir.join(format!("{}.{}", name, self.extension))
    }

    /// Name of a library folder containing the entry's title, ignoring case.
    pub async fn find_in_library(&self, entry: &Entry) -> Option<String> {
        let dir = self.library_dir.as_ref()?;
        let wanted = entry.name.to_lowercase();
        let mut read = match tokio::fs::read_dir(dir).await {
            Ok(read) => read,
            Err(e) => {
                log::warn!("Cannot read library directory {}: {}", dir.display(), e);
                return None;
            }
        };
        loop {
            let item = match read.next_entry().await {
                Ok(Some(item)) => item,
                Ok(None) => return None,
                Err(e) => {
                    log::warn!("Error listing {}: {}", dir.display(), e);
                    return None;
                }
            };
            let name = item.file_name().to_string_lossy().into_owned();
            if !name.to_lowercase().contains(&wanted) {
                continue;
            }
            // Follows symlinks, so linked movie folders count
            let is_dir = tokio::fs::metadata(item.path())
                .await
                .is_ok_and(|m| m.is_dir());
            if is_dir {
                return Some(name);
            }
        }
    }

    /// Reason to skip `entry` without downloading, if any.
    pub async fn existing(&self, entry: &Entry) -> Option<DownloadOutcome> {
        let target = self.target_path(entry);
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Some(DownloadOutcome::AlreadyPresent(target));
        }
        self.find_in_library(entry)
            .await
            .map(DownloadOutcome::InLibrary)
    }

    /// Fetch `uri` into the entry's target path unless it is already there.
    pub async fn download(&self, entry: &Entry, uri: &str) -> Result<DownloadOutcome, ScrapeError> {
        if let Some(existing) = self.existing(entry).await {
            return Ok(existing);
        }
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.target_path(entry);
        let bytes = self.client.download_to(uri, &path).await?;
        log::info!("Saved {} ({} bytes)", path.display(), bytes);
        Ok(DownloadOutcome::Downloaded { path, bytes })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::client::{ClientConfig, part_path};

    fn downloader(out: &Path) -> Downloader {
        let client = Arc::new(HttpClient::new(&ClientConfig::default()).unwrap());
        Downloader::new(client, out)
    }

    #[test]
    fn target_path_uses_label() {
        let d = downloader(Path::new("/out"));
        assert_eq!(
            d.target_path(&Entry::manual("AC/DC: Live", 1992)),
            PathBuf::from("/out/AC-DC: Live (1992).torrent")
        );
        assert_eq!(
            d.target_path(&Entry::new("Mystery", "https://x/film/mystery/")),
            PathBuf::from("/out/Mystery (Unknown).torrent")
        );
    }

    #[tokio::test]
    async fn second_download_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/dune.torrent")
            .with_body(b"d8:announce")
            .expect(1)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("torrents");
        let d = downloader(&out);
        let entry = Entry::manual("Dune", 2021);
        let uri = format!("{}/dune.torrent", server.url());

        let first = d.download(&entry, &uri).await.unwrap();
        let target = out.join("Dune (2021).torrent");
        assert_eq!(
            first,
            DownloadOutcome::Downloaded {
                path: target.clone(),
                bytes: 11
            }
        );
        assert_eq!(std::fs::read(&target).unwrap(), b"d8:announce");

        let second = d.download(&entry, &uri).await.unwrap();
        assert_eq!(second, DownloadOutcome::AlreadyPresent(target));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn library_folder_skips_download() {
        let server = mockito::Server::new_async().await;
        let tmp = tempfile::tempdir().unwrap();
        let library = tmp.path().join("movies");
        std::fs::create_dir_all(library.join("The Dune Collection [2021]")).unwrap();
        std::fs::write(library.join("heat.txt"), "not a folder").unwrap();

        let d = downloader(&tmp.path().join("out")).with_library_dir(Some(library));
        let outcome = d
            .download(&Entry::manual("dune", 2021), &format!("{}/never", server.url()))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            DownloadOutcome::InLibrary("The Dune Collection [2021]".to_string())
        );
        assert!(d.find_in_library(&Entry::manual("Heat", 1995)).await.is_none());
    }

    #[tokio::test]
    async fn failed_download_leaves_nothing_behind() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/gone.torrent")
            .with_status(404)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let d = downloader(tmp.path());
        let entry = Entry::manual("Gone", 2001);
        let err = d
            .download(&entry, &format!("{}/gone.torrent", server.url()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "non-2xx-status");
        let target = d.target_path(&entry);
        assert!(!target.exists());
        assert!(!part_path(&target).exists());
    }
}
