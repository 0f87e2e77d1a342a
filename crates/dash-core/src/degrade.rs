//! Degradation policy
//!
//! Turns a [`FetchOutcome`] into a [`DomainReport`] that is always well
//! formed. A failed fetch yields the zeroed record plus a diagnostic; a
//! disabled domain yields the zeroed record silently.

use crate::adapter::FetchOutcome;
use dash_analytics::AnalyticsRecord;
use serde::Serialize;
use std::time::Duration;

/// How a domain's analytics were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainState {
    /// Reduced from a successful listing
    Ok,
    /// Switched off in configuration
    Disabled,
    /// Upstream failed; analytics are zeroed
    Degraded,
}

/// One domain's analytics plus provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainReport<R> {
    /// Reduced or zeroed record
    pub analytics: R,
    /// Upstream latency in milliseconds, 0 when disabled
    pub latency_ms: f64,
    pub state: DomainState,
    /// Cause of degradation, empty otherwise
    pub diagnostic: String,
}

impl<R: AnalyticsRecord> DomainReport<R> {
    /// Zeroed record for a disabled domain
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            analytics: R::zeroed(),
            latency_ms: 0.0,
            state: DomainState::Disabled,
            diagnostic: String::new(),
        }
    }

    /// Zeroed record with a diagnostic
    #[must_use]
    pub fn degraded(cause: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            analytics: R::zeroed(),
            latency_ms: millis(elapsed),
            state: DomainState::Degraded,
            diagnostic: cause.into(),
        }
    }

    /// Diagnostic if degraded
    #[inline]
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        (self.state == DomainState::Degraded).then_some(self.diagnostic.as_str())
    }

    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.state == DomainState::Degraded
    }
}

/// Apply the degradation policy to one domain
///
/// The reducer only runs on a successful fetch.
pub fn reduce_or_degrade<T, R, F>(outcome: FetchOutcome<T>, reduce: F) -> DomainReport<R>
where
    R: AnalyticsRecord,
    F: FnOnce(&T) -> R,
{
    match outcome {
        FetchOutcome::Fetched(timed) => DomainReport {
            analytics: reduce(&timed.value),
            latency_ms: millis(timed.elapsed),
            state: DomainState::Ok,
            diagnostic: String::new(),
        },
        FetchOutcome::Failed { error, elapsed } => {
            tracing::warn!(domain = %R::DOMAIN, %error, "domain degraded");
            metrics::counter!("dashboard_domain_degraded_total", "domain" => R::DOMAIN.name())
                .increment(1);
            DomainReport::degraded(error.diagnostic(), elapsed)
        }
        FetchOutcome::Disabled => {
            tracing::debug!(domain = %R::DOMAIN, "domain disabled");
            DomainReport::disabled()
        }
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn millis(elapsed: Duration) -> f64 {
    elapsed.as_nanos() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Timed;
    use crate::error::SourceError;
    use dash_analytics::{reduce_rooms, EgressAnalytics, RoomAnalytics};
    use dash_records::Room;
    use pretty_assertions::assert_eq;

    #[test]
    fn fetched_is_reduced() {
        let outcome = FetchOutcome::Fetched(Timed::new(
            vec![Room::new("a", 3)],
            Duration::from_millis(12),
        ));
        let report = reduce_or_degrade(outcome, |rooms: &Vec<Room>| reduce_rooms(rooms));

        assert_eq!(report.state, DomainState::Ok);
        assert_eq!(report.analytics.active_rooms, 1);
        assert_eq!(report.latency_ms, 12.0);
        assert!(report.diagnostic().is_none());
    }

    #[test]
    fn failure_is_zeroed_with_diagnostic() {
        let outcome: FetchOutcome<Vec<Room>> = FetchOutcome::Failed {
            error: SourceError::Unavailable("connection refused".to_string()),
            elapsed: Duration::from_millis(3),
        };
        let report = reduce_or_degrade(outcome, |rooms: &Vec<Room>| reduce_rooms(rooms));

        assert_eq!(report.analytics, RoomAnalytics::zeroed());
        assert!(report.is_degraded());
        assert_eq!(
            report.diagnostic(),
            Some("media server unavailable: connection refused")
        );
    }

    #[test]
    fn disabled_skips_reducer() {
        let outcome: FetchOutcome<Vec<dash_records::EgressJob>> = FetchOutcome::Disabled;
        let report = reduce_or_degrade(outcome, |_| -> EgressAnalytics {
            panic!("reducer must not run for a disabled domain")
        });

        assert_eq!(report.state, DomainState::Disabled);
        assert_eq!(report.analytics, EgressAnalytics::zeroed());
        assert_eq!(report.latency_ms, 0.0);
        assert!(report.diagnostic().is_none());
    }

    #[test]
    fn degraded_record_serializes_every_key() {
        let report: DomainReport<EgressAnalytics> =
            DomainReport::degraded("timeout", Duration::ZERO);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["state"], "degraded");
        assert_eq!(json["analytics"]["success_rate"], 0.0);
        assert_eq!(json["analytics"]["egress_types"]["room_composite"], 0);
    }
}
