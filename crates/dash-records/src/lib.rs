//! Dashboard Records
//!
//! Read-only snapshots of what the media server reports for each listing
//! call. Records are fetched fresh on every request and never mutated
//! locally.
//!
//! # Core Concepts
//!
//! - [`Room`] / [`Participant`]: live sessions and the peers inside them
//! - [`EgressJob`]: recording/export jobs with [`EgressStatus`] and [`EgressKind`]
//! - [`IngressEndpoint`]: inbound feeds with [`IngressState`] and [`IngressInput`]
//! - [`SipTrunk`] / [`DispatchRule`]: telephony routing configuration
//!
//! Every enumerated field carries an `Other` variant so that values added by
//! newer servers decode instead of failing the whole listing.
//!
//! # Example
//!
//! ```rust
//! use dash_records::{EgressJob, EgressKind, EgressStatus, Room};
//!
//! let room = Room::new("standup", 4);
//! assert!(room.is_active());
//!
//! let job = EgressJob::new("EG_1", EgressStatus::Complete, EgressKind::RoomComposite);
//! assert!(job.status.is_terminal());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod egress;
mod ingress;
mod room;
mod sip;

pub use egress::{EgressJob, EgressKind, EgressOutput, EgressStatus};
pub use ingress::{IngressEndpoint, IngressInput, IngressState};
pub use room::{Participant, Room};
pub use sip::{AgentDispatch, DispatchRule, DispatchRuleKind, SipAuth, SipTrunk, TrunkDirection};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
