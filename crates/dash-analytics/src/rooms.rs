//! Room reducer

use crate::distribution::Distribution;
use crate::record::{AnalyticsRecord, Domain, Measure};
use dash_records::Room;
use serde::Serialize;

/// Room size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomSize {
    /// No participants
    Empty,
    /// 1 to 5 participants
    Small,
    /// 6 to 20 participants
    Medium,
    /// 21 or more participants
    Large,
}

impl RoomSize {
    /// Bucket for a participant count
    #[must_use]
    pub fn of(participants: u32) -> Self {
        match participants {
            0 => Self::Empty,
            1..=5 => Self::Small,
            6..=20 => Self::Medium,
            _ => Self::Large,
        }
    }

    /// Distribution label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Display order of the buckets
    pub const ALL: [RoomSize; 4] = [Self::Small, Self::Medium, Self::Large, Self::Empty];
}

/// Aggregated room statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomAnalytics {
    /// Rooms listed
    pub total_rooms: u64,
    /// Rooms with at least one participant
    pub active_rooms: u64,
    /// Rooms with no participants
    pub empty_rooms: u64,
    /// Participants across all rooms
    pub total_participants: u64,
    /// Participants per active room; empty rooms are excluded
    pub avg_participants: f64,
    /// small / medium / large / empty
    pub room_sizes: Distribution,
    /// Needs room creation history the listing API does not keep
    pub rooms_created_today: Measure<u64>,
}

impl Default for RoomAnalytics {
    fn default() -> Self {
        Self {
            total_rooms: 0,
            active_rooms: 0,
            empty_rooms: 0,
            total_participants: 0,
            avg_participants: 0.0,
            room_sizes: Distribution::with_buckets(RoomSize::ALL.iter().map(RoomSize::label)),
            rooms_created_today: Measure::unavailable("room history is not retained"),
        }
    }
}

impl AnalyticsRecord for RoomAnalytics {
    const DOMAIN: Domain = Domain::Rooms;

    fn record_count(&self) -> u64 {
        self.total_rooms
    }
}

/// Fold a room listing into [`RoomAnalytics`]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reduce_rooms(rooms: &[Room]) -> RoomAnalytics {
    let mut analytics = RoomAnalytics::default();

    for room in rooms {
        let size = RoomSize::of(room.num_participants);
        analytics.room_sizes.increment(size.label());
        analytics.total_rooms += 1;

        if size == RoomSize::Empty {
            analytics.empty_rooms += 1;
        } else {
            analytics.active_rooms += 1;
            analytics.total_participants += u64::from(room.num_participants);
        }
    }

    if analytics.active_rooms > 0 {
        analytics.avg_participants =
            analytics.total_participants as f64 / analytics.active_rooms as f64;
    }

    debug_assert_eq!(analytics.room_sizes.total(), analytics.total_rooms);
    debug_assert_eq!(
        analytics.active_rooms + analytics.empty_rooms,
        analytics.total_rooms
    );
    analytics
}
