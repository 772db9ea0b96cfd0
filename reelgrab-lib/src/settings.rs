//! User settings (site URLs, directories, worker counts, quality list).
//!
//! The settings file lives at `~/.config/reelgrab/settings.toml`. Every
//! field has a default, so a missing file or a partial file is fine.
//! Resolution order is CLI flag > environment variable > file > default;
//! the CLI layer applies flags on top of what [`Settings::load`] returns.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Environment variable overriding `download.output_dir`.
pub const ENV_OUTPUT_DIR: &str = "REELGRAB_OUTPUT_DIR";
/// Environment variable overriding `download.library_dir`.
pub const ENV_LIBRARY_DIR: &str = "REELGRAB_LIBRARY_DIR";
/// Environment variable overriding `download.workers`.
pub const ENV_WORKERS: &str = "REELGRAB_WORKERS";
/// Environment variable overriding `index.api_url`.
pub const ENV_INDEX_URL: &str = "REELGRAB_INDEX_URL";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub letterboxd: LetterboxdSettings,
    pub index: IndexSettings,
    pub download: DownloadSettings,
}

/// How listing and detail pages are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterboxdSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Posters on a full watchlist page
    pub page_size: usize,
    /// Pause between listing pages
    pub page_delay_ms: u64,
    /// Safety cap on pages fetched per listing
    pub max_pages: u32,
    pub request_timeout_secs: u64,
    /// Concurrent detail-page fetches during enrichment
    pub enrich_workers: usize,
}

impl Default for LetterboxdSettings {
    fn default() -> Self {
        Self {
            base_url: "https://letterboxd.com".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            page_size: 20,
            page_delay_ms: 1000,
            max_pages: 500,
            request_timeout_secs: 10,
            enrich_workers: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub api_url: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            api_url: "https://yts.mx/api/v2".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    pub output_dir: PathBuf,
    /// Existing movie library; a folder here naming the title skips the download
    pub library_dir: Option<PathBuf>,
    /// Where watchlist snapshots are written
    pub snapshot_dir: PathBuf,
    pub workers: usize,
    /// Quality tiers in order of preference
    pub quality: Vec<String>,
    pub connect_timeout_secs: u64,
    pub extension: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./torrents"),
            library_dir: None,
            snapshot_dir: PathBuf::from("."),
            workers: 10,
            quality: vec!["2160p".to_string(), "1080p".to_string()],
            connect_timeout_secs: 10,
            extension: "torrent".to_string(),
        }
    }
}

/// Canonical path to the settings file: `~/.config/reelgrab/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("reelgrab").join("settings.toml")
}

impl Settings {
    /// Load from the default path, then apply environment overrides.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = Self::load_from(&settings_path())?;
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply `REELGRAB_*` overrides using `lookup` to read variables.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SettingsError> {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.is_empty()) {
            self.download.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_LIBRARY_DIR).filter(|v| !v.is_empty()) {
            self.download.library_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup(ENV_INDEX_URL).filter(|v| !v.is_empty()) {
            self.index.api_url = url;
        }
        if let Some(workers) = lookup(ENV_WORKERS) {
            self.download.workers = workers
                .trim()
                .parse()
                .map_err(|_| SettingsError::invalid(ENV_WORKERS, format!("not a number: {workers:?}")))?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.download.workers == 0 {
            return Err(SettingsError::invalid("download.workers", "must be at least 1"));
        }
        if self.letterboxd.enrich_workers == 0 {
            return Err(SettingsError::invalid(
                "letterboxd.enrich_workers",
                "must be at least 1",
            ));
        }
        if self.letterboxd.page_size == 0 {
            return Err(SettingsError::invalid("letterboxd.page_size", "must be at least 1"));
        }
        Ok(())
    }

    /// Write a default settings file if none exists. Returns whether a file
    /// was written.
    ///
    /// Written atomically via a temporary file and rename.
    pub fn write_default_if_missing(path: &Path) -> Result<bool, SettingsError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = Self::default().to_toml_string()?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [download]
            output_dir = "/tmp/torrents"
            quality = ["1080p", "720p"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.download.output_dir, PathBuf::from("/tmp/torrents"));
        assert_eq!(settings.download.quality, vec!["1080p", "720p"]);
        assert_eq!(settings.download.workers, 10);
        assert_eq!(settings.letterboxd.page_size, 20);
        assert_eq!(settings.index.api_url, "https://yts.mx/api/v2");
    }

    #[test]
    fn zero_workers_rejected() {
        let err = Settings::from_toml_str("[download]\nworkers = 0\n").unwrap_err();
        assert!(err.to_string().contains("download.workers"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut settings = Settings::default();
        settings
            .apply_env_overrides(|key| match key {
                ENV_OUTPUT_DIR => Some("/data/torrents".to_string()),
                ENV_LIBRARY_DIR => Some("/media/movies".to_string()),
                ENV_WORKERS => Some("4".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(settings.download.output_dir, PathBuf::from("/data/torrents"));
        assert_eq!(
            settings.download.library_dir,
            Some(PathBuf::from("/media/movies"))
        );
        assert_eq!(settings.download.workers, 4);
    }

    #[test]
    fn bad_worker_env_is_an_error() {
        let mut settings = Settings::default();
        let result = settings.apply_env_overrides(|key| {
            (key == ENV_WORKERS).then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn default_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reelgrab").join("settings.toml");
        assert!(Settings::write_default_if_missing(&path).unwrap());
        assert!(!Settings::write_default_if_missing(&path).unwrap());
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }
}
