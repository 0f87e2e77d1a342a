//! JSON snapshot source
//!
//! A [`MediaSource`] backed by a captured listing of every domain. Used by the
//! `dash` binary for offline rendering and by tests. A snapshot can script
//! failures and delays per listing call.
//!
//! Each listing decodes on its own. A listing that does not decode (for
//! example a negative participant count) is served as
//! [`SourceError::Malformed`] for its call; the other listings are unaffected.

use crate::error::{SnapshotError, SourceError};
use crate::source::MediaSource;
use async_trait::async_trait;
use dash_records::{DispatchRule, EgressJob, IngressEndpoint, Participant, Room, SipTrunk};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Captured state of a media server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub rooms: Vec<Room>,
    /// Participants of all rooms, each tagged with its `room`
    pub participants: Vec<Participant>,
    pub egress: Vec<EgressJob>,
    pub ingress: Vec<IngressEndpoint>,
    pub sip_inbound_trunks: Vec<SipTrunk>,
    pub sip_outbound_trunks: Vec<SipTrunk>,
    pub dispatch_rules: Vec<DispatchRule>,
    /// Listing call name to failure message
    pub failures: HashMap<String, String>,
    /// Listing call name to artificial latency in milliseconds
    pub delays_ms: HashMap<String, u64>,
}

/// [`MediaSource`] serving a [`Snapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    snapshot: Snapshot,
    /// Listing call name to decode error
    malformed: HashMap<&'static str, String>,
}

impl SnapshotSource {
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            malformed: HashMap::new(),
        }
    }

    /// Parse a snapshot from JSON text
    ///
    /// # Errors
    /// `SnapshotError::Parse` when the text is not a JSON object or its
    /// `failures`/`delays_ms` maps do not decode. Undecodable listings are
    /// not an error here; their calls fail with `SourceError::Malformed`.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let serde_json::Value::Object(mut object) = serde_json::from_str(json)? else {
            return Err(SnapshotError::Parse(<serde_json::Error as serde::de::Error>::custom(
                "snapshot must be a JSON object",
            )));
        };

        let mut malformed = HashMap::new();

        let snapshot = Snapshot {
            rooms: decode_listing((object.remove("rooms"), "list_rooms"), &mut malformed),
            participants: decode_listing(
                (object.remove("participants"), "list_participants"),
                &mut malformed,
            ),
            egress: decode_listing((object.remove("egress"), "list_egress"), &mut malformed),
            ingress: decode_listing((object.remove("ingress"), "list_ingress"), &mut malformed),
            sip_inbound_trunks: decode_listing(
                (object.remove("sip_inbound_trunks"), "list_sip_inbound_trunks"),
                &mut malformed,
            ),
            sip_outbound_trunks: decode_listing(
                (object.remove("sip_outbound_trunks"), "list_sip_outbound_trunks"),
                &mut malformed,
            ),
            dispatch_rules: decode_listing(
                (object.remove("dispatch_rules"), "list_sip_dispatch_rules"),
                &mut malformed,
            ),
            failures: decode_map(object.remove("failures"))?,
            delays_ms: decode_map(object.remove("delays_ms"))?,
        };

        for (call, error) in &malformed {
            tracing::warn!(call, %error, "snapshot listing does not decode");
        }
        Ok(Self {
            snapshot,
            malformed,
        })
    }

    /// Read and parse a snapshot file
    ///
    /// # Errors
    /// `SnapshotError::Io` if the file cannot be read, `SnapshotError::Parse`
    /// if it does not decode.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let source = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), rooms = source.snapshot.rooms.len(), "snapshot loaded");
        Ok(source)
    }

    /// Underlying snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    async fn serve<T: Clone>(&self, call: &str, records: &[T]) -> Result<Vec<T>, SourceError> {
        if let Some(ms) = self.snapshot.delays_ms.get(call) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if let Some(message) = self.snapshot.failures.get(call) {
            return Err(SourceError::Unavailable(message.clone()));
        }
        if let Some(error) = self.malformed.get(call) {
            return Err(SourceError::Malformed(error.clone()));
        }
        Ok(records.to_vec())
    }
}

fn decode_listing<T: DeserializeOwned>(
    (value, call): (Option<serde_json::Value>, &'static str),
    malformed: &mut HashMap<&'static str, String>,
) -> Vec<T> {
    let Some(value) = value else {
        return Vec::new();
    };
    serde_json::from_value(value).unwrap_or_else(|e| {
        malformed.insert(call, e.to_string());
        Vec::new()
    })
}

fn decode_map<V: DeserializeOwned>(
    value: Option<serde_json::Value>,
) -> Result<HashMap<String, V>, serde_json::Error> {
    value.map_or_else(|| Ok(HashMap::new()), serde_json::from_value)
}

#[async_trait]
impl MediaSource for SnapshotSource {
    async fn list_rooms(&self) -> Result<Vec<Room>, SourceError> {
        self.serve("list_rooms", &self.snapshot.rooms).await
    }

    async fn list_participants(&self, room: &str) -> Result<Vec<Participant>, SourceError> {
        let all = self
            .serve("list_participants", &self.snapshot.participants)
            .await?;
        Ok(all.into_iter().filter(|p| p.room == room).collect())
    }

    async fn list_egress(&self) -> Result<Vec<EgressJob>, SourceError> {
        self.serve("list_egress", &self.snapshot.egress).await
    }

    async fn list_ingress(&self) -> Result<Vec<IngressEndpoint>, SourceError> {
        self.serve("list_ingress", &self.snapshot.ingress).await
    }

    async fn list_sip_inbound_trunks(&self) -> Result<Vec<SipTrunk>, SourceError> {
        self.serve("list_sip_inbound_trunks", &self.snapshot.sip_inbound_trunks)
            .await
    }

    async fn list_sip_outbound_trunks(&self) -> Result<Vec<SipTrunk>, SourceError> {
        self.serve("list_sip_outbound_trunks", &self.snapshot.sip_outbound_trunks)
            .await
    }

    async fn list_sip_dispatch_rules(&self) -> Result<Vec<DispatchRule>, SourceError> {
        self.serve("list_sip_dispatch_rules", &self.snapshot.dispatch_rules)
            .await
    }
}
