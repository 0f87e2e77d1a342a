//! Testing utilities for the dashboard workspace
//!
//! Shared fixtures and a call-counting source wrapper.

#![allow(missing_docs)]

use async_trait::async_trait;
use dash_core::{
    DashboardAssembler, DashboardConfig, MediaSource, Snapshot, SnapshotSource, SourceError,
};
use dash_records::{
    DispatchRule, DispatchRuleKind, EgressJob, EgressKind, EgressStatus, IngressEndpoint,
    IngressInput, IngressState, Participant, Room, SipTrunk,
};
use dashmap::DashMap;
use std::sync::Arc;

/// Rooms with 0, 3 and 22 participants
pub fn rooms_fixture() -> Vec<Room> {
    vec![
        Room::new("lobby", 0),
        Room::new("standup", 3),
        Room::new("town-hall", 22),
    ]
}

/// One complete, one failed and one active job
pub fn egress_fixture() -> Vec<EgressJob> {
    vec![
        EgressJob::new("EG_done", EgressStatus::Complete, EgressKind::RoomComposite),
        EgressJob::new("EG_fail", EgressStatus::Failed, EgressKind::Track),
        EgressJob::new("EG_live", EgressStatus::Active, EgressKind::Web),
    ]
}

pub fn ingress_fixture() -> Vec<IngressEndpoint> {
    vec![
        IngressEndpoint::new("IN_rtmp", IngressState::EndpointPublishing, IngressInput::Rtmp),
        IngressEndpoint::new("IN_whip", IngressState::EndpointWaiting, IngressInput::Whip),
    ]
}

pub fn participants_fixture() -> Vec<Participant> {
    vec![
        Participant::new("alice")
            .with_metadata(r#"{"platform":"android"}"#)
            .in_room("standup"),
        Participant::new("recorder-bot").in_room("standup"),
        Participant::new("carol")
            .with_name("Safari on iPhone")
            .with_tracks(2)
            .in_room("town-hall"),
    ]
}

/// Populated snapshot covering every domain
pub fn snapshot_fixture() -> Snapshot {
    Snapshot {
        rooms: rooms_fixture(),
        participants: participants_fixture(),
        egress: egress_fixture(),
        ingress: ingress_fixture(),
        sip_inbound_trunks: vec![SipTrunk::inbound("ST_main"), SipTrunk::inbound("ST_spare")],
        sip_outbound_trunks: vec![SipTrunk::outbound("ST_out")],
        dispatch_rules: vec![
            DispatchRule::new("SDR_main", DispatchRuleKind::Individual, "call-")
                .for_trunks(["ST_main"]),
        ],
        ..Snapshot::default()
    }
}

/// Fixture snapshot with `call` scripted to fail
pub fn failing_snapshot(call: &str, message: &str) -> Snapshot {
    let mut snapshot = snapshot_fixture();
    snapshot
        .failures
        .insert(call.to_string(), message.to_string());
    snapshot
}

/// Fixture snapshot with `call` delayed by `ms`
pub fn slow_snapshot(call: &str, ms: u64) -> Snapshot {
    let mut snapshot = snapshot_fixture();
    snapshot.delays_ms.insert(call.to_string(), ms);
    snapshot
}

/// Wraps a source and records how often each listing call was made
#[derive(Debug, Default)]
pub struct CountingSource<S> {
    inner: S,
    calls: DashMap<&'static str, usize>,
}

impl<S: MediaSource> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: DashMap::new(),
        }
    }

    /// Number of times `call` was made
    pub fn calls(&self, call: &str) -> usize {
        self.calls.get(call).map_or(0, |count| *count)
    }

    fn record(&self, call: &'static str) {
        *self.calls.entry(call).or_insert(0) += 1;
    }
}

#[async_trait]
impl<S: MediaSource> MediaSource for CountingSource<S> {
    async fn list_rooms(&self) -> Result<Vec<Room>, SourceError> {
        self.record("list_rooms");
        self.inner.list_rooms().await
    }

    async fn list_participants(&self, room: &str) -> Result<Vec<Participant>, SourceError> {
        self.record("list_participants");
        self.inner.list_participants(room).await
    }

    async fn list_egress(&self) -> Result<Vec<EgressJob>, SourceError> {
        self.record("list_egress");
        self.inner.list_egress().await
    }

    async fn list_ingress(&self) -> Result<Vec<IngressEndpoint>, SourceError> {
        self.record("list_ingress");
        self.inner.list_ingress().await
    }

    async fn list_sip_inbound_trunks(&self) -> Result<Vec<SipTrunk>, SourceError> {
        self.record("list_sip_inbound_trunks");
        self.inner.list_sip_inbound_trunks().await
    }

    async fn list_sip_outbound_trunks(&self) -> Result<Vec<SipTrunk>, SourceError> {
        self.record("list_sip_outbound_trunks");
        self.inner.list_sip_outbound_trunks().await
    }

    async fn list_sip_dispatch_rules(&self) -> Result<Vec<DispatchRule>, SourceError> {
        self.record("list_sip_dispatch_rules");
        self.inner.list_sip_dispatch_rules().await
    }
}

/// Counting source over `snapshot`
pub fn counting_source(snapshot: Snapshot) -> Arc<CountingSource<SnapshotSource>> {
    Arc::new(CountingSource::new(SnapshotSource::new(snapshot)))
}

/// Assembler over `source` with `config`
pub fn setup_assembler<S: MediaSource + 'static>(
    config: DashboardConfig,
    source: Arc<S>,
) -> DashboardAssembler {
    DashboardAssembler::new(config, source)
}
