//! Egress (recording/export) jobs

use serde::{Deserialize, Serialize};

/// Egress job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EgressStatus {
    Starting,
    Active,
    Ending,
    Complete,
    Failed,
    Aborted,
    /// Status not known to this build (e.g. `limit_reached`)
    #[serde(other)]
    Other,
}

impl EgressStatus {
    /// Job is still running (starting, active or ending)
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::Active | Self::Ending)
    }

    /// Job has reached a final state (complete, failed or aborted)
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed | Self::Aborted)
    }

    /// Distribution label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Active => "active",
            Self::Ending => "ending",
            Self::Complete => "complete",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
            Self::Other => "other",
        }
    }

    /// Every known status, in display order
    pub const ALL: [EgressStatus; 7] = [
        Self::Starting,
        Self::Active,
        Self::Ending,
        Self::Complete,
        Self::Failed,
        Self::Aborted,
        Self::Other,
    ];
}

/// What the egress job captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EgressKind {
    RoomComposite,
    Participant,
    /// Single track or track composite
    #[serde(alias = "track_composite")]
    Track,
    Web,
    #[serde(other)]
    Other,
}

impl EgressKind {
    /// Distribution label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::RoomComposite => "room_composite",
            Self::Participant => "participant",
            Self::Track => "track",
            Self::Web => "web",
            Self::Other => "other",
        }
    }

    /// Every kind, in display order
    pub const ALL: [EgressKind; 5] = [
        Self::RoomComposite,
        Self::Participant,
        Self::Track,
        Self::Web,
        Self::Other,
    ];
}

/// Where the job writes its output
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EgressOutput {
    File { filepath: String },
    Stream { urls: Vec<String> },
    Segments { playlist: String },
    #[default]
    #[serde(other)]
    Unknown,
}

/// Snapshot of one egress job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgressJob {
    /// Server-assigned job id
    pub egress_id: String,
    /// Source room, empty for web egress
    #[serde(default)]
    pub room_name: String,
    pub status: EgressStatus,
    pub kind: EgressKind,
    #[serde(default)]
    pub output: EgressOutput,
}

impl EgressJob {
    /// Create a job snapshot with no output descriptor
    #[inline]
    #[must_use]
    pub fn new(egress_id: impl Into<String>, status: EgressStatus, kind: EgressKind) -> Self {
        Self {
            egress_id: egress_id.into(),
            room_name: String::new(),
            status,
            kind,
            output: EgressOutput::Unknown,
        }
    }

    /// With source room
    #[inline]
    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room_name = room.into();
        self
    }

    /// With output descriptor
    #[inline]
    #[must_use]
    pub fn with_output(mut self, output: EgressOutput) -> Self {
        self.output = output;
        self
    }
}
