//! Upstream listing seam
//!
//! The RPC client for the media server lives outside this crate; it plugs in
//! by implementing [`MediaSource`]. Every method is read-only.

use crate::error::SourceError;
use async_trait::async_trait;
use dash_records::{DispatchRule, EgressJob, IngressEndpoint, Participant, Room, SipTrunk};

/// Read-only listing calls against the media server
///
/// An empty listing is `Ok(vec![])`, not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// All rooms
    async fn list_rooms(&self) -> Result<Vec<Room>, SourceError>;

    /// Participants of one room
    async fn list_participants(&self, room: &str) -> Result<Vec<Participant>, SourceError>;

    /// Egress jobs, active and recently finished
    async fn list_egress(&self) -> Result<Vec<EgressJob>, SourceError>;

    /// Ingress endpoints
    async fn list_ingress(&self) -> Result<Vec<IngressEndpoint>, SourceError>;

    /// Inbound SIP trunks
    async fn list_sip_inbound_trunks(&self) -> Result<Vec<SipTrunk>, SourceError>;

    /// Outbound SIP trunks
    async fn list_sip_outbound_trunks(&self) -> Result<Vec<SipTrunk>, SourceError>;

    /// SIP dispatch rules
    async fn list_sip_dispatch_rules(&self) -> Result<Vec<DispatchRule>, SourceError>;
}
