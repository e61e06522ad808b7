//! One evaluation cycle across every listed resource.
//!
//! Lists the fleet once, then processes each resource in its own task,
//! at most `max_concurrent_resources` at a time. A cycle always finishes
//! with a report covering every listed resource, even when individual
//! resources fail or the optional deadline cuts the cycle short.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Semaphore, watch};
use tracing::{error, info, warn};

use autoterm_core::{ConfigError, FleetConfig, ResourceLister, ResourceState};

use crate::processor::{
    ActionStatus, ResourceOutcome, ResourceProcessor, ResourceReport,
};

/// Everything that happened in one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Evaluation timestamp every schedule was matched against.
    pub evaluated_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub timed_out: bool,
    /// Set when the fleet could not be listed at all.
    pub listing_error: Option<String>,
    pub resources: Vec<ResourceReport>,
}

impl CycleReport {
    /// Number of resources that were actually evaluated (not skipped).
    pub fn processed(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| matches!(r.outcome, ResourceOutcome::Processed(_)))
            .count()
    }

    /// Count of actions with the given status.
    pub fn count_status(&self, pred: impl Fn(&ActionStatus) -> bool) -> usize {
        self.resources
            .iter()
            .flat_map(|r| r.actions())
            .filter(|a| pred(&a.status))
            .count()
    }

    /// Number of policy decisions aborted by a schedule or conflict error.
    pub fn policy_errors(&self) -> usize {
        self.resources
            .iter()
            .flat_map(|r| r.policies())
            .filter(|p| p.error.is_some())
            .count()
    }
}

/// Drives a [`ResourceProcessor`] across the whole fleet.
pub struct FleetOrchestrator {
    lister: Arc<dyn ResourceLister>,
    processor: Arc<ResourceProcessor>,
    max_concurrent: usize,
    deadline: Option<Duration>,
}

impl FleetOrchestrator {
    pub fn new(lister: Arc<dyn ResourceLister>, processor: Arc<ResourceProcessor>) -> Self {
        let defaults = FleetConfig::default();
        Self {
            lister,
            processor,
            max_concurrent: defaults.max_concurrent_resources,
            deadline: None,
        }
    }

    /// Build from `[fleet]` settings.
    pub fn from_config(
        config: &FleetConfig,
        lister: Arc<dyn ResourceLister>,
        processor: Arc<ResourceProcessor>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(lister, processor)
            .with_max_concurrent(config.max_concurrent_resources)
            .with_deadline(config.cycle_deadline()?))
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Run one cycle with every schedule evaluated at `now`.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> CycleReport {
        let started = Instant::now();
        info!(evaluated_at = %now, dry_run = self.processor.is_dry_run(), "cycle started");

        let mut report = CycleReport {
            evaluated_at: now,
            elapsed_ms: 0,
            timed_out: false,
            listing_error: None,
            resources: Vec::new(),
        };

        match self.lister.list().await {
            Ok(resources) => {
                if resources.is_empty() {
                    warn!("no instances found, nothing to evaluate");
                }
                let remaining = self
                    .deadline
                    .map(|d| d.saturating_sub(started.elapsed()));
                let (resources, timed_out) = self.fan_out(resources, now, remaining).await;
                report.resources = resources;
                report.timed_out = timed_out;
            }
            Err(e) => {
                error!(error = %e, "failed to list instances");
                report.listing_error = Some(e.to_string());
            }
        }

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            resources = report.resources.len(),
            processed = report.processed(),
            applied = report.count_status(|s| *s == ActionStatus::Applied),
            failed = report.count_status(|s| matches!(s, ActionStatus::Failed(_))),
            timed_out = report.timed_out,
            elapsed_ms = report.elapsed_ms,
            "cycle finished"
        );
        report
    }

    /// Process every resource concurrently, bounded by the semaphore.
    async fn fan_out(
        &self,
        resources: Vec<ResourceState>,
        now: DateTime<Utc>,
        deadline: Option<Duration>,
    ) -> (Vec<ResourceReport>, bool) {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut snapshots = Vec::with_capacity(resources.len());
        let mut handles = Vec::with_capacity(resources.len());

        for resource in resources {
            let resource = Arc::new(resource);
            let processor = Arc::clone(&self.processor);
            let semaphore = Arc::clone(&semaphore);
            let snapshot = Arc::clone(&resource);

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(p) => p,
                    Err(e) => {
                        return ResourceReport::new(
                            &resource,
                            ResourceOutcome::Failed(e.to_string()),
                        );
                    }
                };
                processor.process(resource, now).await
            }));
            snapshots.push(snapshot);
        }

        let aborts: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();
        let mut reports: Vec<Option<ResourceReport>> = (0..handles.len()).map(|_| None).collect();

        let join_all = async {
            for (i, handle) in handles.into_iter().enumerate() {
                reports[i] = Some(match handle.await {
                    Ok(report) => report,
                    Err(e) => {
                        let resource = &snapshots[i];
                        error!(resource = %resource.id, error = %e, "resource task failed");
                        ResourceReport::new(resource, ResourceOutcome::Failed(e.to_string()))
                    }
                });
            }
        };

        let timed_out = match deadline {
            Some(limit) => tokio::time::timeout(limit, join_all).await.is_err(),
            None => {
                join_all.await;
                false
            }
        };

        if timed_out {
            let unfinished = reports.iter().filter(|r| r.is_none()).count();
            warn!(unfinished, "cycle deadline exceeded, aborting outstanding resources");
            for abort in &aborts {
                abort.abort();
            }
        }

        let reports = reports
            .into_iter()
            .zip(&snapshots)
            .map(|(report, resource)| {
                report.unwrap_or_else(|| {
                    ResourceReport::new(
                        resource,
                        ResourceOutcome::Failed("cycle deadline exceeded".to_string()),
                    )
                })
            })
            .collect();
        (reports, timed_out)
    }

    /// Run a cycle every `interval` until `shutdown` flips.
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = interval.as_secs(), "scheduler loop started");

        loop {
            self.run_cycle(Utc::now()).await;

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.changed() => {
                    info!("scheduler loop shutting down");
                    break;
                }
            }
        }
    }
}
