//! Dashboard Analytics
//!
//! Pure reducers that fold one domain's listing into a fully populated
//! analytics record.
//!
//! # Core Concepts
//!
//! - [`AnalyticsRecord`]: Trait shared by every per-domain record; its
//!   [`zeroed`](AnalyticsRecord::zeroed) value is the canonical degraded record
//! - [`Distribution`]: Ordered bucket label → count mapping with pre-seeded keys
//! - [`Measure`]: A metric that is either measured or explicitly unavailable
//! - [`PlatformClassifier`]: Pluggable heuristic used by the connection reducer
//!
//! # Reducers
//!
//! | Domain | Input | Reducer |
//! |--------|-------|---------|
//! | rooms | `&[Room]` | [`reduce_rooms`] |
//! | egress | `&[EgressJob]` | [`reduce_egress`] |
//! | ingress | `&[IngressEndpoint]` | [`reduce_ingress`] |
//! | sip | [`SipInventory`] | [`reduce_sip`] |
//! | connections | `&[Participant]` | [`reduce_connections`] |
//!
//! Reducers never read ambient state: the current time and the classifier
//! are passed in explicitly, so the same input always yields the same record.
//!
//! # Example
//!
//! ```rust
//! use dash_analytics::reduce_rooms;
//! use dash_records::Room;
//!
//! let rooms = vec![Room::new("a", 0), Room::new("b", 3), Room::new("c", 22)];
//! let analytics = reduce_rooms(&rooms);
//!
//! assert_eq!(analytics.active_rooms, 2);
//! assert_eq!(analytics.avg_participants, 12.5);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod classify;
mod connections;
mod distribution;
mod egress;
mod ingress;
mod record;
mod rooms;
mod sip;

pub use classify::{HeuristicClassifier, Platform, PlatformClassifier};
pub use connections::{reduce_connections, ConnectionAnalytics, ConnectionType};
pub use distribution::{percent, Distribution};
pub use egress::{reduce_egress, EgressAnalytics};
pub use ingress::{reduce_ingress, IngressAnalytics};
pub use record::{AnalyticsRecord, Domain, Measure};
pub use rooms::{reduce_rooms, RoomAnalytics, RoomSize};
pub use sip::{reduce_sip, SipAnalytics, SipInventory};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use dash_records::{EgressJob, EgressKind, EgressStatus, Room};

    #[test]
    fn zeroed_records_match_empty_input() {
        assert_eq!(reduce_rooms(&[]), RoomAnalytics::zeroed());
        assert_eq!(reduce_egress(&[]), EgressAnalytics::zeroed());
        assert_eq!(reduce_ingress(&[]), IngressAnalytics::zeroed());
        assert_eq!(reduce_sip(&SipInventory::default()), SipAnalytics::zeroed());
    }

    #[test]
    fn record_domains_are_distinct() {
        let domains = [
            RoomAnalytics::DOMAIN,
            EgressAnalytics::DOMAIN,
            IngressAnalytics::DOMAIN,
            SipAnalytics::DOMAIN,
            ConnectionAnalytics::DOMAIN,
        ];
        for (i, a) in domains.iter().enumerate() {
            for b in &domains[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn record_count_tracks_input_size() {
        let rooms = vec![Room::new("a", 1), Room::new("b", 0)];
        assert_eq!(reduce_rooms(&rooms).record_count(), 2);

        let jobs = vec![EgressJob::new("EG_1", EgressStatus::Active, EgressKind::Web)];
        assert_eq!(reduce_egress(&jobs).record_count(), 1);
    }
}
