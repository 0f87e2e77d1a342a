//! Presentation assembler
//!
//! The per-request pipeline behind the overview page:
//! - Fetch every domain concurrently through the timed adapters
//! - Reduce each listing, degrading failed or disabled domains
//! - Merge everything into one [`DashboardContext`] for the templating layer

use crate::adapter::{Adapters, FetchOutcome, ParticipantListing};
use crate::config::DashboardConfig;
use crate::degrade::{reduce_or_degrade, DomainReport};
use crate::source::MediaSource;
use chrono::{DateTime, Utc};
use dash_analytics::{
    reduce_connections, reduce_egress, reduce_ingress, reduce_rooms, reduce_sip,
    ConnectionAnalytics, Domain, EgressAnalytics, HeuristicClassifier, IngressAnalytics,
    PlatformClassifier, RoomAnalytics, SipAnalytics,
};
use dash_records::Room;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Overall media server reachability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Error,
}

/// Server summary shown in the page header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerHealth {
    pub status: HealthStatus,
    pub url: String,
    pub rooms_count: u64,
    pub participants_count: u64,
    /// Round trip of the room listing
    pub sdk_latency_ms: f64,
    pub sip_enabled: bool,
    /// Why the server is considered unhealthy, empty when healthy
    pub error: String,
}

impl ServerHealth {
    /// Derive from the rooms report; the room listing doubles as the health probe
    #[must_use]
    pub fn from_rooms(config: &DashboardConfig, rooms: &DomainReport<RoomAnalytics>) -> Self {
        let (status, error) = match rooms.diagnostic() {
            Some(cause) => (HealthStatus::Error, cause.to_string()),
            None => (HealthStatus::Healthy, String::new()),
        };
        Self {
            status,
            url: config.server_url.clone(),
            rooms_count: rooms.analytics.total_rooms,
            participants_count: rooms.analytics.total_participants,
            sdk_latency_ms: rooms.latency_ms,
            sip_enabled: config.sip_enabled,
            error,
        }
    }
}

/// Everything the overview template renders
///
/// Every field is always present; degraded domains carry zeroed analytics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardContext {
    pub generated_at: DateTime<Utc>,
    pub server: ServerHealth,
    pub rooms: DomainReport<RoomAnalytics>,
    pub egress: DomainReport<EgressAnalytics>,
    pub ingress: DomainReport<IngressAnalytics>,
    pub sip: DomainReport<SipAnalytics>,
    pub connections: DomainReport<ConnectionAnalytics>,
    /// Domains whose upstream call failed
    pub degraded: Vec<Domain>,
}

impl DashboardContext {
    /// `(domain, diagnostic)` for every degraded domain
    #[must_use]
    pub fn diagnostics(&self) -> Vec<(Domain, &str)> {
        [
            (Domain::Rooms, self.rooms.diagnostic()),
            (Domain::Egress, self.egress.diagnostic()),
            (Domain::Ingress, self.ingress.diagnostic()),
            (Domain::Sip, self.sip.diagnostic()),
            (Domain::Connections, self.connections.diagnostic()),
        ]
        .into_iter()
        .filter_map(|(domain, diag)| diag.map(|d| (domain, d)))
        .collect()
    }
}

/// Builds a [`DashboardContext`] per request
///
/// Holds no per-request state: every call to [`assemble`](Self::assemble)
/// fetches and reduces from scratch.
pub struct DashboardAssembler {
    config: DashboardConfig,
    adapters: Adapters,
    classifier: Arc<dyn PlatformClassifier>,
}

impl std::fmt::Debug for DashboardAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardAssembler")
            .field("config", &self.config)
            .field("adapters", &self.adapters)
            .field("classifier", &self.classifier)
            .finish()
    }
}

impl DashboardAssembler {
    /// Create an assembler over `source`
    #[must_use]
    pub fn new(config: DashboardConfig, source: Arc<dyn MediaSource>) -> Self {
        let adapters = Adapters::new(source, config.fetch_timeout());
        Self {
            config,
            adapters,
            classifier: Arc::new(HeuristicClassifier),
        }
    }

    /// Replace the platform classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn PlatformClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Assemble the overview context as of now
    pub async fn assemble(&self) -> DashboardContext {
        self.assemble_at(Utc::now()).await
    }

    /// Assemble the overview context with an explicit clock
    pub async fn assemble_at(&self, now: DateTime<Utc>) -> DashboardContext {
        let ((rooms, participants), egress, ingress, sip) = tokio::join!(
            self.fetch_rooms_and_participants(),
            self.adapters.fetch_egress(),
            self.adapters.fetch_ingress(),
            self.fetch_sip(),
        );

        let rooms = reduce_or_degrade(rooms, |r| reduce_rooms(r));
        let egress = reduce_or_degrade(egress, |e| reduce_egress(e));
        let ingress = reduce_or_degrade(ingress, |i| reduce_ingress(i));
        let sip = reduce_or_degrade(sip, reduce_sip);
        let classifier = self.classifier.as_ref();
        let connections = reduce_or_degrade(participants, |listing: &ParticipantListing| {
            let skipped = u64::try_from(listing.skipped_rooms.len()).unwrap_or(u64::MAX);
            reduce_connections(&listing.participants, classifier, now).with_skipped_rooms(skipped)
        });

        let degraded: Vec<Domain> = [
            (Domain::Rooms, rooms.is_degraded()),
            (Domain::Egress, egress.is_degraded()),
            (Domain::Ingress, ingress.is_degraded()),
            (Domain::Sip, sip.is_degraded()),
            (Domain::Connections, connections.is_degraded()),
        ]
        .into_iter()
        .filter_map(|(domain, failed)| failed.then_some(domain))
        .collect();

        if degraded.is_empty() {
            tracing::info!(
                rooms = rooms.analytics.total_rooms,
                egress = egress.analytics.total_jobs,
                "dashboard assembled"
            );
        } else {
            tracing::warn!(?degraded, "dashboard assembled with degraded domains");
        }

        DashboardContext {
            generated_at: now,
            server: ServerHealth::from_rooms(&self.config, &rooms),
            rooms,
            egress,
            ingress,
            sip,
            connections,
            degraded,
        }
    }

    async fn fetch_sip(&self) -> FetchOutcome<dash_analytics::SipInventory> {
        if !self.config.sip_enabled {
            return FetchOutcome::Disabled;
        }
        self.adapters.fetch_sip().await
    }

    /// Rooms, then participants of exactly those rooms
    ///
    /// Connections degrade with the rooms error when the room listing fails.
    async fn fetch_rooms_and_participants(
        &self,
    ) -> (FetchOutcome<Vec<Room>>, FetchOutcome<ParticipantListing>) {
        let rooms = self.adapters.fetch_rooms().await;
        let participants = match &rooms {
            _ if !self.config.connection_analytics => FetchOutcome::Disabled,
            FetchOutcome::Fetched(timed) => self.adapters.fetch_participants(&timed.value).await,
            FetchOutcome::Failed { error, .. } => FetchOutcome::Failed {
                error: error.clone(),
                elapsed: Duration::ZERO,
            },
            FetchOutcome::Disabled => FetchOutcome::Disabled,
        };
        (rooms, participants)
    }
}
