//! Connection reducer over participants of every room

use crate::classify::{Platform, PlatformClassifier};
use crate::distribution::Distribution;
use crate::record::{AnalyticsRecord, Domain};
use chrono::{DateTime, Utc};
use dash_records::Participant;
use serde::Serialize;

/// How a participant reaches the media server, as far as its region tells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionType {
    /// Region reported and not a relay
    Direct,
    /// Region names a TURN relay
    TurnRelay,
    /// No region reported
    Unknown,
}

impl ConnectionType {
    /// Infer from the participant's region string
    #[must_use]
    pub fn of(region: &str) -> Self {
        if region.is_empty() {
            return Self::Unknown;
        }
        let region = region.to_ascii_lowercase();
        if region.contains("relay") || region.contains("turn") {
            Self::TurnRelay
        } else {
            Self::Direct
        }
    }

    /// Distribution label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::TurnRelay => "turn_relay",
            Self::Unknown => "unknown",
        }
    }

    /// Display order
    pub const ALL: [ConnectionType; 3] = [Self::Direct, Self::TurnRelay, Self::Unknown];
}

/// Aggregated participant connection statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionAnalytics {
    /// Participants across all rooms
    pub participant_count: u64,
    /// Summed session length of participants with a known join time
    pub connection_minutes: f64,
    /// Participants whose join time was not reported
    pub unmeasured_sessions: u64,
    /// Participants per inferred platform
    pub platforms: Distribution,
    /// Participants per connection type
    pub connection_types: Distribution,
    /// Rooms left out because their participant listing failed
    pub skipped_rooms: u64,
}

impl Default for ConnectionAnalytics {
    fn default() -> Self {
        Self {
            participant_count: 0,
            connection_minutes: 0.0,
            unmeasured_sessions: 0,
            platforms: Distribution::with_buckets(Platform::ALL.iter().map(Platform::label)),
            connection_types: Distribution::with_buckets(
                ConnectionType::ALL.iter().map(ConnectionType::label),
            ),
            skipped_rooms: 0,
        }
    }
}

impl ConnectionAnalytics {
    /// Record how many rooms could not be listed
    #[inline]
    #[must_use]
    pub fn with_skipped_rooms(mut self, skipped: u64) -> Self {
        self.skipped_rooms = skipped;
        self
    }
}

impl AnalyticsRecord for ConnectionAnalytics {
    const DOMAIN: Domain = Domain::Connections;

    fn record_count(&self) -> u64 {
        self.participant_count
    }
}

/// Fold participants into [`ConnectionAnalytics`]
///
/// `now` anchors session lengths; join times in the future count as zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reduce_connections(
    participants: &[Participant],
    classifier: &dyn PlatformClassifier,
    now: DateTime<Utc>,
) -> ConnectionAnalytics {
    let mut analytics = ConnectionAnalytics::default();

    for participant in participants {
        analytics.participant_count += 1;
        analytics
            .platforms
            .increment(classifier.classify(participant).label());
        analytics
            .connection_types
            .increment(ConnectionType::of(&participant.region).label());

        match participant.joined_at {
            Some(joined) => {
                let millis = (now - joined).num_milliseconds().max(0);
                analytics.connection_minutes += millis as f64 / 60_000.0;
            }
            None => analytics.unmeasured_sessions += 1,
        }
    }

    debug_assert_eq!(analytics.platforms.total(), analytics.participant_count);
    debug_assert_eq!(analytics.connection_types.total(), analytics.participant_count);
    analytics
}
