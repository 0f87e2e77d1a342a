//! Invariants every reducer must hold for arbitrary listings.

use chrono::{TimeZone, Utc};
use dash_analytics::{
    reduce_connections, reduce_egress, reduce_ingress, reduce_rooms, reduce_sip,
    HeuristicClassifier, SipInventory,
};
use dash_records::{
    DispatchRule, DispatchRuleKind, EgressJob, EgressKind, EgressStatus, IngressEndpoint,
    IngressInput, IngressState, Participant, Room, SipTrunk,
};
use proptest::prelude::*;

fn egress_status() -> impl Strategy<Value = EgressStatus> {
    proptest::sample::select(EgressStatus::ALL.to_vec())
}

fn egress_kind() -> impl Strategy<Value = EgressKind> {
    proptest::sample::select(EgressKind::ALL.to_vec())
}

fn ingress_endpoint() -> impl Strategy<Value = IngressEndpoint> {
    (
        proptest::sample::select(IngressState::ALL.to_vec()),
        proptest::sample::select(IngressInput::ALL.to_vec()),
    )
        .prop_map(|(state, input)| IngressEndpoint::new("IN", state, input))
}

proptest! {
    #[test]
    fn room_buckets_sum_to_total(counts in proptest::collection::vec(0u32..60, 0..40)) {
        let rooms: Vec<Room> = counts.iter().map(|n| Room::new("r", *n)).collect();
        let a = reduce_rooms(&rooms);

        prop_assert_eq!(
            a.room_sizes.get("small") + a.room_sizes.get("medium")
                + a.room_sizes.get("large") + a.room_sizes.get("empty"),
            a.total_rooms
        );
        prop_assert_eq!(a.total_rooms, rooms.len() as u64);
    }

    #[test]
    fn room_average_over_active_rooms(counts in proptest::collection::vec(0u32..60, 0..40)) {
        let rooms: Vec<Room> = counts.iter().map(|n| Room::new("r", *n)).collect();
        let a = reduce_rooms(&rooms);

        let active: Vec<u32> = counts.iter().copied().filter(|n| *n > 0).collect();
        if active.is_empty() {
            prop_assert_eq!(a.avg_participants, 0.0);
        } else {
            let sum: u64 = active.iter().map(|n| u64::from(*n)).sum();
            let expected = sum as f64 / active.len() as f64;
            prop_assert!((a.avg_participants - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn egress_types_sum_and_rate_bounded(
        jobs in proptest::collection::vec((egress_status(), egress_kind()), 0..50)
    ) {
        let jobs: Vec<EgressJob> = jobs
            .into_iter()
            .map(|(s, k)| EgressJob::new("EG", s, k))
            .collect();
        let a = reduce_egress(&jobs);

        prop_assert_eq!(a.egress_types.total(), jobs.len() as u64);
        prop_assert!((0.0..=100.0).contains(&a.success_rate));
        if a.completed_jobs + a.failed_jobs + a.aborted_jobs == 0 {
            prop_assert_eq!(a.success_rate, 0.0);
        }
    }

    #[test]
    fn ingress_types_sum_to_total(endpoints in proptest::collection::vec(ingress_endpoint(), 0..50)) {
        let a = reduce_ingress(&endpoints);

        prop_assert_eq!(a.ingress_types.total(), a.total_ingress);
        prop_assert_eq!(a.states.total(), a.total_ingress);
        prop_assert!(a.active_ingress <= a.total_ingress);
    }

    #[test]
    fn sip_status_sums_to_trunks(inbound in 0usize..10, outbound in 0usize..10, bound in 0usize..10) {
        let inbound_trunks: Vec<_> = (0..inbound).map(|i| SipTrunk::inbound(format!("in-{i}"))).collect();
        let outbound_trunks: Vec<_> = (0..outbound).map(|i| SipTrunk::outbound(format!("out-{i}"))).collect();
        let rules: Vec<_> = (0..bound)
            .map(|i| DispatchRule::new(format!("r{i}"), DispatchRuleKind::Direct, "room").for_trunks([format!("in-{i}")]))
            .collect();
        let a = reduce_sip(&SipInventory::new(inbound_trunks, outbound_trunks, rules));

        prop_assert_eq!(a.total_trunks, (inbound + outbound) as u64);
        prop_assert_eq!(a.trunk_status.total(), a.total_trunks);
        prop_assert_eq!(a.trunk_status.get("active"), inbound.min(bound) as u64);
    }

    #[test]
    fn reducers_are_idempotent(
        counts in proptest::collection::vec(0u32..60, 0..20),
        jobs in proptest::collection::vec((egress_status(), egress_kind()), 0..20)
    ) {
        let rooms: Vec<Room> = counts.iter().map(|n| Room::new("r", *n)).collect();
        let jobs: Vec<EgressJob> = jobs.into_iter().map(|(s, k)| EgressJob::new("EG", s, k)).collect();

        let first = serde_json::to_string(&reduce_rooms(&rooms)).unwrap();
        let second = serde_json::to_string(&reduce_rooms(&rooms)).unwrap();
        prop_assert_eq!(first, second);

        let first = serde_json::to_string(&reduce_egress(&jobs)).unwrap();
        let second = serde_json::to_string(&reduce_egress(&jobs)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn connection_distributions_sum(names in proptest::collection::vec("[a-z]{0,12}", 0..30)) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let participants: Vec<_> = names.iter().map(|n| Participant::new("p").with_name(n.clone())).collect();
        let a = reduce_connections(&participants, &HeuristicClassifier, now);

        prop_assert_eq!(a.platforms.total(), participants.len() as u64);
        prop_assert_eq!(a.connection_types.total(), participants.len() as u64);
        prop_assert_eq!(a.unmeasured_sessions, participants.len() as u64);
    }
}

#[test]
fn unknown_values_only_touch_other_and_total() {
    let jobs = vec![
        EgressJob::new("a", EgressStatus::Complete, EgressKind::Web),
        EgressJob::new("b", EgressStatus::Other, EgressKind::Other),
    ];
    let a = reduce_egress(&jobs);

    assert_eq!(a.total_jobs, 2);
    assert_eq!(a.egress_types.get("other"), 1);
    assert_eq!(a.statuses.get("other"), 1);
    assert_eq!(a.completed_jobs, 1);
    assert_eq!(a.active_jobs, 0);
    assert_eq!(a.success_rate, 100.0);
}
