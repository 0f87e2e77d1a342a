//! Ingress reducer

use crate::distribution::Distribution;
use crate::record::{AnalyticsRecord, Domain, Measure};
use dash_records::{IngressEndpoint, IngressInput, IngressState};
use serde::Serialize;

/// Aggregated ingress statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngressAnalytics {
    /// Endpoints listed
    pub total_ingress: u64,
    /// Publishing or buffering
    pub active_ingress: u64,
    /// Endpoints per input type
    pub ingress_types: Distribution,
    /// Endpoints per state
    pub states: Distribution,
    /// Needs media statistics the listing API does not report
    pub avg_bitrate_mbps: Measure<f64>,
    /// Needs media statistics the listing API does not report
    pub connection_stability: Measure<f64>,
}

impl Default for IngressAnalytics {
    fn default() -> Self {
        Self {
            total_ingress: 0,
            active_ingress: 0,
            ingress_types: Distribution::with_buckets(
                IngressInput::ALL.iter().map(IngressInput::label),
            ),
            states: Distribution::with_buckets(IngressState::ALL.iter().map(IngressState::label)),
            avg_bitrate_mbps: Measure::unavailable("bitrate requires per-stream RTC stats"),
            connection_stability: Measure::unavailable("stability requires historical samples"),
        }
    }
}

impl AnalyticsRecord for IngressAnalytics {
    const DOMAIN: Domain = Domain::Ingress;

    fn record_count(&self) -> u64 {
        self.total_ingress
    }
}

/// Fold an ingress listing into [`IngressAnalytics`]
#[must_use]
pub fn reduce_ingress(endpoints: &[IngressEndpoint]) -> IngressAnalytics {
    let mut analytics = IngressAnalytics::default();

    for endpoint in endpoints {
        analytics.total_ingress += 1;
        if endpoint.state.is_active() {
            analytics.active_ingress += 1;
        }
        analytics.ingress_types.increment(endpoint.input_type.label());
        analytics.states.increment(endpoint.state.label());
    }

    debug_assert_eq!(analytics.ingress_types.total(), analytics.total_ingress);
    analytics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_active_and_types() {
        let endpoints = vec![
            IngressEndpoint::new("1", IngressState::EndpointPublishing, IngressInput::Rtmp),
            IngressEndpoint::new("2", IngressState::EndpointBuffering, IngressInput::Whip),
            IngressEndpoint::new("3", IngressState::EndpointWaiting, IngressInput::Rtmp),
            IngressEndpoint::new("4", IngressState::EndpointError, IngressInput::Url),
        ];
        let analytics = reduce_ingress(&endpoints);

        assert_eq!(analytics.total_ingress, 4);
        assert_eq!(analytics.active_ingress, 2);
        assert_eq!(analytics.ingress_types.get("rtmp"), 2);
        assert_eq!(analytics.ingress_types.get("whip"), 1);
        assert_eq!(analytics.ingress_types.get("url"), 1);
        assert_eq!(analytics.states.get("error"), 1);
    }

    #[test]
    fn unknown_values_land_in_other() {
        let endpoints = vec![IngressEndpoint::new("x", IngressState::Other, IngressInput::Other)];
        let analytics = reduce_ingress(&endpoints);

        assert_eq!(analytics.total_ingress, 1);
        assert_eq!(analytics.active_ingress, 0);
        assert_eq!(analytics.ingress_types.get("other"), 1);
        assert_eq!(analytics.states.get("other"), 1);
    }
}
