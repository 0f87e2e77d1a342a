//! Platform inference from participant metadata
//!
//! Heuristic by nature: client SDKs are free to put anything in metadata or
//! names. The classifier is a trait so deployments with a reliable signal
//! can plug their own in; whatever cannot be classified is
//! [`Platform::Unknown`].

use dash_records::Participant;
use once_cell::sync::Lazy;
use regex::Regex;

/// Client platform bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Browser SDK
    Web,
    /// iOS / iPadOS
    Ios,
    /// Android
    Android,
    /// React Native or JS runtime
    React,
    /// Server-side SDK or agent
    Server,
    /// No usable signal
    Unknown,
}

impl Platform {
    /// Distribution label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Ios => "ios",
            Self::Android => "android",
            Self::React => "react",
            Self::Server => "server",
            Self::Unknown => "unknown",
        }
    }

    /// Display order
    pub const ALL: [Platform; 6] = [
        Self::Web,
        Self::Ios,
        Self::Android,
        Self::React,
        Self::Server,
        Self::Unknown,
    ];
}

/// Maps a participant to a [`Platform`]
pub trait PlatformClassifier: Send + Sync + std::fmt::Debug {
    /// Classify one participant; must not fail
    fn classify(&self, participant: &Participant) -> Platform;
}

static PATTERNS: Lazy<Vec<(Platform, Regex)>> = Lazy::new(|| {
    [
        (Platform::Ios, r"(?i)ios|iphone|ipad"),
        (Platform::Android, r"(?i)android"),
        (Platform::Web, r"(?i)web|browser|chrome|firefox|safari|mozilla"),
        (Platform::React, r"(?i)react|\bjs\b|node"),
        (Platform::Server, r"(?i)python|server|agent"),
    ]
    .into_iter()
    .filter_map(|(platform, pattern)| Regex::new(pattern).ok().map(|re| (platform, re)))
    .collect()
});

/// Metadata keys SDKs commonly use to announce themselves
const METADATA_KEYS: [&str; 3] = ["platform", "client", "userAgent"];

/// Default classifier
///
/// Checks, in order: JSON metadata keys (`platform`, `client`,
/// `userAgent`), the display name, the identity. A participant publishing no
/// tracks with no other signal is assumed to be a server-side client.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    fn match_text(text: &str) -> Option<Platform> {
        if text.is_empty() {
            return None;
        }
        PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(platform, _)| *platform)
    }

    fn from_metadata(metadata: &str) -> Option<Platform> {
        let value: serde_json::Value = serde_json::from_str(metadata).ok()?;
        METADATA_KEYS
            .iter()
            .filter_map(|key| value.get(key).and_then(serde_json::Value::as_str))
            .find_map(Self::match_text)
    }
}

impl PlatformClassifier for HeuristicClassifier {
    fn classify(&self, participant: &Participant) -> Platform {
        Self::from_metadata(&participant.metadata)
            .or_else(|| Self::match_text(&participant.name))
            .or_else(|| Self::match_text(&participant.identity))
            .unwrap_or(if participant.track_count == 0 {
                Platform::Server
            } else {
                Platform::Unknown
            })
    }
}
