use serde::{Deserialize, Serialize};

/// Video quality tier of a downloadable release.
///
/// The named tiers cover what torrent indexes commonly publish. Anything
/// else is kept verbatim (lowercased) in `Other` so it can still be matched
/// against a user-supplied preference list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Quality {
    Uhd2160,
    Fhd1080,
    Hd720,
    Sd480,
    ThreeD,
    Other(String),
}

impl Quality {
    /// Canonical label as published by the index (e.g. "1080p").
    pub fn label(&self) -> &str {
        match self {
            Self::Uhd2160 => "2160p",
            Self::Fhd1080 => "1080p",
            Self::Hd720 => "720p",
            Self::Sd480 => "480p",
            Self::ThreeD => "3D",
            Self::Other(s) => s,
        }
    }

    /// Accepted spellings for each named tier, canonical label first.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Uhd2160 => &["2160p", "4k", "uhd"],
            Self::Fhd1080 => &["1080p", "fhd"],
            Self::Hd720 => &["720p", "hd"],
            Self::Sd480 => &["480p", "sd"],
            Self::ThreeD => &["3d"],
            Self::Other(_) => &[],
        }
    }

    /// Classify a label coming from the index. Never fails.
    pub fn from_label(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        NAMED_TIERS
            .iter()
            .find(|q| q.aliases().contains(&lower.as_str()))
            .cloned()
            .unwrap_or(Self::Other(lower))
    }
}

const NAMED_TIERS: &[Quality] = &[
    Quality::Uhd2160,
    Quality::Fhd1080,
    Quality::Hd720,
    Quality::Sd480,
    Quality::ThreeD,
];

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid quality: '{0}'")]
pub struct QualityParseError(pub String);

impl std::str::FromStr for Quality {
    type Err = QualityParseError;

    /// Parse a quality tier (case-insensitive). Unrecognized but non-empty
    /// labels such as "1080p.x265" parse to `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(QualityParseError(s.to_string()));
        }
        Ok(Self::from_label(s))
    }
}

impl Serialize for Quality {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Quality {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One downloadable option returned by the index for a film.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub quality: Quality,
    pub resource_uri: String,
    pub size: Option<String>,
}

/// Ordered list of acceptable quality tiers, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityPreference(Vec<Quality>);

impl Default for QualityPreference {
    fn default() -> Self {
        Self(vec![Quality::Uhd2160, Quality::Fhd1080])
    }
}

impl QualityPreference {
    pub fn new(tiers: Vec<Quality>) -> Self {
        Self(tiers)
    }

    /// Parse from a list of labels (e.g. `["2160p", "1080p", "720p"]`).
    pub fn from_names(names: &[String]) -> Result<Self, QualityParseError> {
        names
            .iter()
            .map(|n| n.parse())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn tiers(&self) -> &[Quality] {
        &self.0
    }

    /// Pick the candidate at the most preferred tier present.
    ///
    /// Candidates at tiers not on the list are never chosen. When several
    /// candidates share the winning tier, the first one wins.
    pub fn select<'a>(&self, candidates: &'a [Candidate]) -> Option<&'a Candidate> {
        self.0
            .iter()
            .find_map(|tier| candidates.iter().find(|c| &c.quality == tier))
    }
}

impl std::fmt::Display for QualityPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(|q| q.label()).collect();
        f.write_str(&labels.join(", "))
    }
}

#[cfg(test)]
#[path = "tests/quality_tests.rs"]
mod tests;
