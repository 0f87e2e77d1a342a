//! Ingress endpoints

use serde::{Deserialize, Serialize};

/// Ingress endpoint state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngressState {
    EndpointWaiting,
    EndpointBuffering,
    EndpointPublishing,
    EndpointError,
    #[serde(other)]
    Other,
}

impl IngressState {
    /// Media is flowing or about to (publishing or buffering)
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::EndpointPublishing | Self::EndpointBuffering)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::EndpointWaiting => "waiting",
            Self::EndpointBuffering => "buffering",
            Self::EndpointPublishing => "publishing",
            Self::EndpointError => "error",
            Self::Other => "other",
        }
    }

    pub const ALL: [IngressState; 5] = [
        Self::EndpointWaiting,
        Self::EndpointBuffering,
        Self::EndpointPublishing,
        Self::EndpointError,
        Self::Other,
    ];
}

/// Protocol the endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngressInput {
    Rtmp,
    Whip,
    /// Pull from a URL
    Url,
    #[serde(other)]
    Other,
}

impl IngressInput {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rtmp => "rtmp",
            Self::Whip => "whip",
            Self::Url => "url",
            Self::Other => "other",
        }
    }

    pub const ALL: [IngressInput; 4] = [Self::Rtmp, Self::Whip, Self::Url, Self::Other];
}

/// Snapshot of one ingress endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressEndpoint {
    pub ingress_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub room_name: String,
    pub state: IngressState,
    pub input_type: IngressInput,
}

impl IngressEndpoint {
    /// Create an endpoint snapshot
    #[inline]
    #[must_use]
    pub fn new(ingress_id: impl Into<String>, state: IngressState, input_type: IngressInput) -> Self {
        Self {
            ingress_id: ingress_id.into(),
            name: String::new(),
            room_name: String::new(),
            state,
            input_type,
        }
    }

    /// With target room
    #[inline]
    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room_name = room.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffering_counts_as_active() {
        assert!(IngressState::EndpointBuffering.is_active());
        assert!(IngressState::EndpointPublishing.is_active());
        assert!(!IngressState::EndpointWaiting.is_active());
        assert!(!IngressState::EndpointError.is_active());
        assert!(!IngressState::Other.is_active());
    }

    #[test]
    fn endpoint_decodes_unknown_input() {
        let endpoint: IngressEndpoint = serde_json::from_str(
            r#"{"ingress_id":"IN_1","state":"endpoint_publishing","input_type":"srt"}"#,
        )
        .unwrap();
        assert_eq!(endpoint.input_type, IngressInput::Other);
        assert!(endpoint.state.is_active());
    }
}
