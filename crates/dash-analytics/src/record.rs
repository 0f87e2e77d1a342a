//! Analytics record trait and shared value types

use serde::Serialize;

/// Dashboard domain backed by one family of listing calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Rooms
    Rooms,
    /// Egress jobs
    Egress,
    /// Ingress endpoints
    Ingress,
    /// SIP trunks and dispatch rules
    Sip,
    /// Participants across all rooms
    Connections,
}

impl Domain {
    /// Stable lowercase name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rooms => "rooms",
            Self::Egress => "egress",
            Self::Ingress => "ingress",
            Self::Sip => "sip",
            Self::Connections => "connections",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of one domain reducer
///
/// `Default` must produce the fully populated zero record: every count zero,
/// every distribution seeded with its buckets, every ratio zero.
pub trait AnalyticsRecord: Clone + Default + Serialize + Send + Sync + 'static {
    /// Domain this record describes
    const DOMAIN: Domain;

    /// Canonical zero-valued record, used when the domain is degraded or
    /// disabled
    #[inline]
    #[must_use]
    fn zeroed() -> Self {
        Self::default()
    }

    /// Number of upstream records folded into this one
    fn record_count(&self) -> u64;
}

/// A metric the upstream API may not be able to provide
///
/// Unmeasurable values are reported as such rather than filled with
/// plausible-looking numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Measure<T> {
    /// Measured value
    Available {
        /// The value
        value: T,
    },
    /// Not measurable from the listing APIs
    Unavailable {
        /// Why the value is missing
        reason: &'static str,
    },
}

impl<T> Measure<T> {
    /// Unavailable with a reason
    #[inline]
    #[must_use]
    pub const fn unavailable(reason: &'static str) -> Self {
        Self::Unavailable { reason }
    }

    /// Measured value
    #[inline]
    #[must_use]
    pub const fn available(value: T) -> Self {
        Self::Available { value }
    }

    /// Value if measured
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Available { value } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    /// Whether a value is present
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}
