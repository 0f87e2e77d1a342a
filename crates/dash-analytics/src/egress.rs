//! Egress reducer

use crate::distribution::{percent, Distribution};
use crate::record::{AnalyticsRecord, Domain, Measure};
use dash_records::{EgressJob, EgressKind, EgressStatus};
use serde::Serialize;

/// Aggregated egress statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EgressAnalytics {
    /// Jobs listed
    pub total_jobs: u64,
    /// Starting, active or ending
    pub active_jobs: u64,
    /// Jobs with status `complete`
    pub completed_jobs: u64,
    /// Jobs with status `failed`
    pub failed_jobs: u64,
    /// Jobs with status `aborted`
    pub aborted_jobs: u64,
    /// `completed / (completed + failed + aborted)` in percent
    pub success_rate: f64,
    /// Jobs per egress kind
    pub egress_types: Distribution,
    /// Jobs per status
    pub statuses: Distribution,
    /// Needs storage backend metrics
    pub storage_used_gb: Measure<f64>,
}

impl Default for EgressAnalytics {
    fn default() -> Self {
        Self {
            total_jobs: 0,
            active_jobs: 0,
            completed_jobs: 0,
            failed_jobs: 0,
            aborted_jobs: 0,
            success_rate: 0.0,
            egress_types: Distribution::with_buckets(EgressKind::ALL.iter().map(EgressKind::label)),
            statuses: Distribution::with_buckets(EgressStatus::ALL.iter().map(EgressStatus::label)),
            storage_used_gb: Measure::unavailable("storage usage is not reported by the egress API"),
        }
    }
}

impl AnalyticsRecord for EgressAnalytics {
    const DOMAIN: Domain = Domain::Egress;

    fn record_count(&self) -> u64 {
        self.total_jobs
    }
}

/// Fold an egress listing into [`EgressAnalytics`]
#[must_use]
pub fn reduce_egress(jobs: &[EgressJob]) -> EgressAnalytics {
    let mut analytics = EgressAnalytics::default();

    for job in jobs {
        analytics.total_jobs += 1;
        analytics.egress_types.increment(job.kind.label());
        analytics.statuses.increment(job.status.label());

        match job.status {
            EgressStatus::Complete => analytics.completed_jobs += 1,
            EgressStatus::Failed => analytics.failed_jobs += 1,
            EgressStatus::Aborted => analytics.aborted_jobs += 1,
            s if s.is_active() => analytics.active_jobs += 1,
            _ => {}
        }
    }

    let terminal = analytics.completed_jobs + analytics.failed_jobs + analytics.aborted_jobs;
    analytics.success_rate = percent(analytics.completed_jobs, terminal);

    debug_assert_eq!(analytics.egress_types.total(), analytics.total_jobs);
    debug_assert_eq!(analytics.statuses.total(), analytics.total_jobs);
    analytics
}
