//! Rooms and participants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live session container on the media server
///
/// The participant count is unsigned: a negative count from the wire is
/// rejected when the listing is decoded, never handed to a reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room name
    pub name: String,
    /// Participants currently connected
    #[serde(default)]
    pub num_participants: u32,
    /// When the server created the room
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
    /// Opaque application metadata
    #[serde(default)]
    pub metadata: String,
}

impl Room {
    /// Create a room snapshot
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, num_participants: u32) -> Self {
        Self {
            name: name.into(),
            num_participants,
            creation_time: None,
            metadata: String::new(),
        }
    }

    /// With creation time
    #[inline]
    #[must_use]
    pub fn with_creation_time(mut self, at: DateTime<Utc>) -> Self {
        self.creation_time = Some(at);
        self
    }

    /// A room with at least one participant
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.num_participants > 0
    }
}

/// A peer connected to a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identity within the room
    pub identity: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Free-text metadata, frequently a JSON object set by the client SDK
    #[serde(default)]
    pub metadata: String,
    /// Edge region the participant is connected through
    #[serde(default)]
    pub region: String,
    /// Join time, when the server reported one
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    /// Number of published tracks
    #[serde(default)]
    pub track_count: u32,
    /// Owning room (filled in by the adapter)
    #[serde(default)]
    pub room: String,
}

impl Participant {
    /// Create a participant with only an identity
    #[inline]
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            name: String::new(),
            metadata: String::new(),
            region: String::new(),
            joined_at: None,
            track_count: 0,
            room: String::new(),
        }
    }

    /// With display name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// With metadata
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// With region
    #[inline]
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// With join time
    #[inline]
    #[must_use]
    pub fn with_joined_at(mut self, at: DateTime<Utc>) -> Self {
        self.joined_at = Some(at);
        self
    }

    /// With published track count
    #[inline]
    #[must_use]
    pub fn with_tracks(mut self, count: u32) -> Self {
        self.track_count = count;
        self
    }

    /// Tag with the owning room
    #[inline]
    #[must_use]
    pub fn in_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_activity() {
        assert!(!Room::new("empty", 0).is_active());
        assert!(Room::new("busy", 3).is_active());
    }

    #[test]
    fn room_decodes_with_defaults() {
        let room: Room = serde_json::from_str(r#"{"name":"lobby"}"#).unwrap();
        assert_eq!(room, Room::new("lobby", 0));
    }

    #[test]
    fn negative_participant_count_is_rejected() {
        let result = serde_json::from_str::<Room>(r#"{"name":"bad","num_participants":-1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn participant_builder() {
        let p = Participant::new("alice")
            .with_name("Alice (iPhone)")
            .with_region("us-east")
            .with_tracks(2)
            .in_room("standup");

        assert_eq!(p.identity, "alice");
        assert_eq!(p.room, "standup");
        assert_eq!(p.track_count, 2);
        assert!(p.joined_at.is_none());
    }
}
