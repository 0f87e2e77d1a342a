//! SIP reducer

use crate::distribution::Distribution;
use crate::record::{AnalyticsRecord, Domain, Measure};
use dash_records::{DispatchRule, DispatchRuleKind, SipTrunk, TrunkDirection};
use serde::Serialize;

/// Everything the SIP service lists, fetched together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SipInventory {
    /// Inbound and outbound trunks
    pub trunks: Vec<SipTrunk>,
    /// Dispatch rules
    pub rules: Vec<DispatchRule>,
}

impl SipInventory {
    /// Combine separately listed trunks and rules
    #[must_use]
    pub fn new(inbound: Vec<SipTrunk>, outbound: Vec<SipTrunk>, rules: Vec<DispatchRule>) -> Self {
        let mut trunks = inbound;
        trunks.extend(outbound);
        Self { trunks, rules }
    }
}

/// Aggregated SIP statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SipAnalytics {
    /// inbound + outbound
    pub total_trunks: u64,
    /// Trunks accepting calls
    pub inbound_trunks: u64,
    /// Trunks placing calls
    pub outbound_trunks: u64,
    /// Dispatch rules listed
    pub dispatch_rules: u64,
    /// `active` when at least one dispatch rule routes to the trunk,
    /// `configured` otherwise
    pub trunk_status: Distribution,
    /// Rules per dispatch kind
    pub rule_kinds: Distribution,
    /// Needs call records from the SIP service
    pub call_volume: Measure<u64>,
    /// Needs call records from the SIP service
    pub connection_success_rate: Measure<f64>,
}

impl Default for SipAnalytics {
    fn default() -> Self {
        Self {
            total_trunks: 0,
            inbound_trunks: 0,
            outbound_trunks: 0,
            dispatch_rules: 0,
            trunk_status: Distribution::with_buckets(["active", "configured"]),
            rule_kinds: Distribution::with_buckets(
                DispatchRuleKind::ALL.iter().map(DispatchRuleKind::label),
            ),
            call_volume: Measure::unavailable("call volume requires call logs"),
            connection_success_rate: Measure::unavailable("call outcomes require call logs"),
        }
    }
}

impl AnalyticsRecord for SipAnalytics {
    const DOMAIN: Domain = Domain::Sip;

    fn record_count(&self) -> u64 {
        self.total_trunks
    }
}

/// Fold SIP trunks and dispatch rules into [`SipAnalytics`]
#[must_use]
pub fn reduce_sip(inventory: &SipInventory) -> SipAnalytics {
    let mut analytics = SipAnalytics::default();

    for trunk in &inventory.trunks {
        analytics.total_trunks += 1;
        match trunk.direction {
            TrunkDirection::Inbound => analytics.inbound_trunks += 1,
            TrunkDirection::Outbound => analytics.outbound_trunks += 1,
        }

        let routed = inventory.rules.iter().any(|rule| rule.applies_to(trunk));
        analytics
            .trunk_status
            .increment(if routed { "active" } else { "configured" });
    }

    for rule in &inventory.rules {
        analytics.dispatch_rules += 1;
        analytics.rule_kinds.increment(rule.kind.label());
    }

    debug_assert_eq!(analytics.trunk_status.total(), analytics.total_trunks);
    debug_assert_eq!(analytics.rule_kinds.total(), analytics.dispatch_rules);
    analytics
}
