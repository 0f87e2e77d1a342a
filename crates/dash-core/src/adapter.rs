//! Timed adapters over [`MediaSource`]
//!
//! Each adapter turns one domain's listing calls into a collection paired
//! with the elapsed wall-clock time. A call that misses the deadline becomes
//! [`SourceError::Timeout`]; the adapter never retries.

use crate::error::SourceError;
use crate::source::MediaSource;
use dash_analytics::{Domain, SipInventory};
use dash_records::{EgressJob, IngressEndpoint, Participant, Room};
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// A fetched collection and how long fetching took
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    /// Fetched records
    pub value: T,
    /// Wall-clock time spent in upstream calls
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    /// Pair a value with its elapsed time
    #[inline]
    #[must_use]
    pub fn new(value: T, elapsed: Duration) -> Self {
        Self { value, elapsed }
    }
}

/// Result of fetching one domain
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// Listing succeeded
    Fetched(Timed<T>),
    /// Upstream call failed after `elapsed`
    Failed {
        /// Cause
        error: SourceError,
        /// Time spent before failing
        elapsed: Duration,
    },
    /// Domain switched off in configuration; nothing was called
    Disabled,
}

/// Participants gathered across rooms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantListing {
    /// Participants tagged with their room
    pub participants: Vec<Participant>,
    /// Rooms whose listing failed
    pub skipped_rooms: Vec<String>,
}

/// Timed, deadline-bounded access to every domain's listings
#[derive(Clone)]
pub struct Adapters {
    source: Arc<dyn MediaSource>,
    timeout: Duration,
}

impl std::fmt::Debug for Adapters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapters")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Adapters {
    /// Wrap a source with a per-call deadline
    #[inline]
    #[must_use]
    pub fn new(source: Arc<dyn MediaSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Per-call deadline
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Rooms
    pub async fn fetch_rooms(&self) -> FetchOutcome<Vec<Room>> {
        self.timed(Domain::Rooms, async {
            self.bounded("list_rooms", self.source.list_rooms()).await
        })
        .await
    }

    /// Egress jobs
    pub async fn fetch_egress(&self) -> FetchOutcome<Vec<EgressJob>> {
        self.timed(Domain::Egress, async {
            self.bounded("list_egress", self.source.list_egress()).await
        })
        .await
    }

    /// Ingress endpoints
    pub async fn fetch_ingress(&self) -> FetchOutcome<Vec<IngressEndpoint>> {
        self.timed(Domain::Ingress, async {
            self.bounded("list_ingress", self.source.list_ingress()).await
        })
        .await
    }

    /// Inbound trunks, outbound trunks and dispatch rules
    ///
    /// The three calls run concurrently; any failure fails the domain.
    pub async fn fetch_sip(&self) -> FetchOutcome<SipInventory> {
        self.timed(Domain::Sip, async {
            let (inbound, outbound, rules) = tokio::try_join!(
                self.bounded("list_sip_inbound_trunks", self.source.list_sip_inbound_trunks()),
                self.bounded("list_sip_outbound_trunks", self.source.list_sip_outbound_trunks()),
                self.bounded("list_sip_dispatch_rules", self.source.list_sip_dispatch_rules()),
            )?;
            Ok::<_, SourceError>(SipInventory::new(inbound, outbound, rules))
        })
        .await
    }

    /// Participants of every room in `rooms`, tagged with their room
    ///
    /// A room whose listing fails, typically because it closed after the room
    /// listing, is skipped and recorded in
    /// [`skipped_rooms`](ParticipantListing::skipped_rooms). This fetch never
    /// fails as a whole.
    pub async fn fetch_participants(&self, rooms: &[Room]) -> FetchOutcome<ParticipantListing> {
        self.timed(Domain::Connections, async {
            let per_room = join_all(rooms.iter().map(|room| async move {
                let result = self
                    .bounded("list_participants", self.source.list_participants(&room.name))
                    .await;
                (room, result)
            }))
            .await;

            let mut listing = ParticipantListing::default();
            for (room, result) in per_room {
                match result {
                    Ok(participants) => listing
                        .participants
                        .extend(participants.into_iter().map(|p| p.in_room(room.name.clone()))),
                    Err(error) => {
                        tracing::warn!(room = %room.name, %error, "skipping room");
                        listing.skipped_rooms.push(room.name.clone());
                    }
                }
            }
            Ok::<_, SourceError>(listing)
        })
        .await
    }

    async fn bounded<T, F>(&self, call: &'static str, fut: F) -> Result<T, SourceError>
    where
        F: Future<Output = Result<T, SourceError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                call,
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    async fn timed<T, F>(&self, domain: Domain, fut: F) -> FetchOutcome<T>
    where
        F: Future<Output = Result<T, SourceError>>,
    {
        let started = Instant::now();
        let result = fut.await;
        let elapsed = started.elapsed();

        metrics::histogram!("dashboard_fetch_seconds", "domain" => domain.name())
            .record(elapsed.as_secs_f64());

        match result {
            Ok(value) => {
                tracing::debug!(%domain, elapsed_ms = elapsed.as_millis() as u64, "fetched");
                FetchOutcome::Fetched(Timed::new(value, elapsed))
            }
            Err(error) => {
                tracing::debug!(%domain, %error, "fetch failed");
                FetchOutcome::Failed { error, elapsed }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockMediaSource;
    use dash_records::{DispatchRule, DispatchRuleKind, SipTrunk};

    fn adapters(mock: MockMediaSource) -> Adapters {
        Adapters::new(Arc::new(mock), Duration::from_millis(200))
    }

    #[tokio::test]
    async fn rooms_are_fetched_with_elapsed() {
        let mut mock = MockMediaSource::new();
        mock.expect_list_rooms()
            .times(1)
            .returning(|| Ok(vec![Room::new("a", 1)]));

        match adapters(mock).fetch_rooms().await {
            FetchOutcome::Fetched(timed) => assert_eq!(timed.value.len(), 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_listing_is_not_an_error() {
        let mut mock = MockMediaSource::new();
        mock.expect_list_egress().returning(|| Ok(Vec::new()));

        assert!(matches!(
            adapters(mock).fetch_egress().await,
            FetchOutcome::Fetched(Timed { ref value, .. }) if value.is_empty()
        ));
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let mut mock = MockMediaSource::new();
        mock.expect_list_ingress()
            .returning(|| Err(SourceError::Unauthorized("bad secret".to_string())));

        match adapters(mock).fetch_ingress().await {
            FetchOutcome::Failed { error, .. } => {
                assert!(matches!(error, SourceError::Unauthorized(_)));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sip_combines_three_listings() {
        let mut mock = MockMediaSource::new();
        mock.expect_list_sip_inbound_trunks()
            .returning(|| Ok(vec![SipTrunk::inbound("in")]));
        mock.expect_list_sip_outbound_trunks()
            .returning(|| Ok(vec![SipTrunk::outbound("out")]));
        mock.expect_list_sip_dispatch_rules()
            .returning(|| Ok(vec![DispatchRule::new("r", DispatchRuleKind::Direct, "x")]));

        match adapters(mock).fetch_sip().await {
            FetchOutcome::Fetched(timed) => {
                assert_eq!(timed.value.trunks.len(), 2);
                assert_eq!(timed.value.rules.len(), 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn one_failing_sip_call_fails_domain() {
        let mut mock = MockMediaSource::new();
        mock.expect_list_sip_inbound_trunks().returning(|| Ok(Vec::new()));
        mock.expect_list_sip_outbound_trunks()
            .returning(|| Err(SourceError::Unavailable("503".to_string())));
        mock.expect_list_sip_dispatch_rules().returning(|| Ok(Vec::new()));

        assert!(matches!(
            adapters(mock).fetch_sip().await,
            FetchOutcome::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn participants_are_tagged_with_room() {
        let mut mock = MockMediaSource::new();
        mock.expect_list_rooms().never();
        mock.expect_list_participants().returning(|room| {
            Ok(vec![Participant::new(format!("{room}-p"))])
        });

        let rooms = vec![Room::new("a", 1), Room::new("b", 2)];
        match adapters(mock).fetch_participants(&rooms).await {
            FetchOutcome::Fetched(timed) => {
                let rooms: Vec<_> = timed
                    .value
                    .participants
                    .iter()
                    .map(|p| p.room.as_str())
                    .collect();
                assert_eq!(rooms, vec!["a", "b"]);
                assert!(timed.value.skipped_rooms.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failing_room_is_skipped_not_fatal() {
        let mut mock = MockMediaSource::new();
        mock.expect_list_participants().returning(|room| {
            if room == "b" {
                Err(SourceError::Unavailable("room not found".to_string()))
            } else {
                Ok(vec![Participant::new("p1"), Participant::new("p2")])
            }
        });

        let rooms = vec![Room::new("a", 2), Room::new("b", 1)];
        match adapters(mock).fetch_participants(&rooms).await {
            FetchOutcome::Fetched(timed) => {
                assert_eq!(timed.value.participants.len(), 2);
                assert_eq!(timed.value.skipped_rooms, vec!["b".to_string()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
