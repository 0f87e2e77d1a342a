//! Dashboard Core - overview page pipeline
//!
//! Turns raw media-server listings into the context rendered by the
//! dashboard overview page:
//! - Timed, deadline-bounded adapters over a pluggable [`MediaSource`]
//! - A degradation policy that zeroes any domain whose upstream call fails
//! - An assembler that fetches every domain concurrently and merges the result
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_core::{DashboardAssembler, DashboardConfig, SnapshotSource};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::new().overlay_env()?;
//! let source = SnapshotSource::load("snapshot.json").await?;
//! let assembler = DashboardAssembler::new(config, Arc::new(source));
//!
//! let context = assembler.assemble().await;
//! println!("{} active rooms", context.rooms.analytics.active_rooms);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod adapter;
pub mod assembler;
pub mod config;
pub mod degrade;
pub mod error;
pub mod snapshot;
pub mod source;

pub use adapter::{Adapters, FetchOutcome, ParticipantListing, Timed};
pub use assembler::{DashboardAssembler, DashboardContext, HealthStatus, ServerHealth};
pub use config::DashboardConfig;
pub use degrade::{reduce_or_degrade, DomainReport, DomainState};
pub use error::{ConfigError, SnapshotError, SourceError};
pub use snapshot::{Snapshot, SnapshotSource};
pub use source::MediaSource;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for assembling a dashboard
    pub use crate::{
        DashboardAssembler, DashboardConfig, DashboardContext, DomainReport, DomainState,
        MediaSource, SnapshotSource, SourceError,
    };
    pub use dash_analytics::{AnalyticsRecord, Domain};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    const SNAPSHOT: &str = r#"{
        "rooms": [
            {"name": "empty", "num_participants": 0},
            {"name": "standup", "num_participants": 2},
            {"name": "town-hall", "num_participants": 22}
        ],
        "participants": [
            {"identity": "alice", "room": "standup", "metadata": "{\"platform\":\"ios\"}",
             "joined_at": "2026-01-01T09:50:00Z", "region": "eu-west"},
            {"identity": "bob", "room": "standup", "name": "Chrome on macOS", "track_count": 2}
        ],
        "egress": [
            {"egress_id": "EG_1", "status": "complete", "kind": "room_composite"},
            {"egress_id": "EG_2", "status": "failed", "kind": "track"},
            {"egress_id": "EG_3", "status": "active", "kind": "web"}
        ],
        "ingress": [
            {"ingress_id": "IN_1", "state": "endpoint_publishing", "input_type": "rtmp"}
        ],
        "sip_inbound_trunks": [{"trunk_id": "ST_in", "direction": "inbound"}],
        "sip_outbound_trunks": [{"trunk_id": "ST_out", "direction": "outbound"}],
        "dispatch_rules": [{"rule_id": "SDR_1", "kind": "individual", "room": "call-"}]
    }"#;

    #[tokio::test]
    async fn snapshot_end_to_end() {
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        let config = DashboardConfig::new().with_sip(true);
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();

        let context = DashboardAssembler::new(config, Arc::new(source))
            .assemble_at(now)
            .await;

        assert!(context.degraded.is_empty());
        assert_eq!(context.rooms.analytics.active_rooms, 2);
        assert_eq!(context.rooms.analytics.avg_participants, 12.0);
        assert_eq!(context.egress.analytics.success_rate, 50.0);
        assert_eq!(context.ingress.analytics.active_ingress, 1);
        assert_eq!(context.sip.analytics.total_trunks, 2);
        assert_eq!(context.sip.analytics.trunk_status.get("active"), 1);
        assert_eq!(context.connections.analytics.participant_count, 2);
        assert_eq!(context.connections.analytics.connection_minutes, 10.0);
        assert_eq!(context.connections.analytics.unmeasured_sessions, 1);
    }
}
