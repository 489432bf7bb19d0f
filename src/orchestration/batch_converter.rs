//! # Batch Idempotent Converter
//!
//! Drives a set of [`JobGroup`]s through a [`Converter`] into an
//! [`ArtifactStore`]:
//!
//! 1. compute the artifact path for (group, identifier)
//! 2. artifact present → record [`JobOutcome::AlreadyPresent`], no call
//! 3. otherwise call the converter exactly once and await it
//! 4. success → persist the bytes, record [`JobOutcome::Succeeded`]
//! 5. failure → record [`JobOutcome::Failed`] and continue
//!
//! Nothing inside a batch is fatal. A failed job leaves no artifact, so the
//! next run re-attempts it.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::artifacts::ArtifactStore;
use crate::conversion::Converter;
use crate::logging::{log_batch_summary, log_job_outcome};
use crate::models::{
    BatchReport, ConversionJob, FailureStage, GroupReport, JobGroup, JobOutcome, JobRecord,
    PlanStatus, PlannedJob,
};

pub struct BatchConverter {
    store: ArtifactStore,
    converter: Arc<dyn Converter>,
}

impl BatchConverter {
    pub fn new(store: ArtifactStore, converter: Arc<dyn Converter>) -> Self {
        Self { store, converter }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Process every group in order and collect a report
    pub async fn run(&self, groups: &[JobGroup]) -> BatchReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(
            run_id = %run_id,
            converter = %self.converter.name(),
            groups = groups.len(),
            jobs = groups.iter().map(JobGroup::len).sum::<usize>(),
            output_root = %self.store.root().display(),
            "Starting batch"
        );

        let mut reports = Vec::with_capacity(groups.len());
        for group in groups {
            reports.push(self.run_group_inner(run_id, group).await);
        }

        let report = BatchReport {
            run_id,
            converter: self.converter.name().to_string(),
            started_at,
            finished_at: Utc::now(),
            groups: reports,
        };

        log_batch_summary(&report);
        report
    }

    /// Process a single group outside of a full batch run
    pub async fn run_group(&self, group: &JobGroup) -> GroupReport {
        self.run_group_inner(Uuid::new_v4(), group).await
    }

    async fn run_group_inner(&self, run_id: Uuid, group: &JobGroup) -> GroupReport {
        info!(
            run_id = %run_id,
            group = %group.name(),
            parameter = %group.parameter(),
            jobs = group.len(),
            "Processing group"
        );

        // Persisting creates the directory again, so failure here is only logged
        if let Err(e) = self.store.ensure_group_dir(group.name()).await {
            warn!(
                run_id = %run_id,
                group = %group.name(),
                error = %e,
                "Could not create group directory"
            );
        }

        let mut report = GroupReport::new(group.name(), group.parameter());
        for job in group.jobs() {
            let record = self.process_job(job, group.parameter()).await;
            log_job_outcome(run_id, &record);
            report.records.push(record);
        }
        report
    }

    async fn process_job(&self, job: &ConversionJob, parameter: &str) -> JobRecord {
        let artifact_path = self.store.artifact_path(&job.group, &job.identifier);

        let outcome = match self.store.exists(&job.group, &job.identifier).await {
            Ok(true) => JobOutcome::AlreadyPresent,
            Ok(false) => self.convert_and_persist(job, parameter).await,
            Err(e) => JobOutcome::Failed {
                stage: FailureStage::Persistence,
                detail: format!("could not check artifact: {e}"),
            },
        };

        JobRecord {
            group: job.group.clone(),
            identifier: job.identifier.clone(),
            artifact_path,
            outcome,
        }
    }

    async fn convert_and_persist(&self, job: &ConversionJob, parameter: &str) -> JobOutcome {
        let bytes = match self.converter.convert(&job.payload, parameter).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return JobOutcome::Failed {
                    stage: FailureStage::Conversion,
                    detail: e.to_string(),
                }
            }
        };

        match self.store.persist(&job.group, &job.identifier, &bytes).await {
            Ok(_) => JobOutcome::Succeeded {
                bytes_written: bytes.len(),
            },
            Err(e) => JobOutcome::Failed {
                stage: FailureStage::Persistence,
                detail: e.to_string(),
            },
        }
    }

    /// Dry run over this driver's store; see [`plan_groups`]
    pub async fn plan(&self, groups: &[JobGroup]) -> Vec<PlannedJob> {
        plan_groups(&self.store, groups).await
    }
}

/// Dry run: report which jobs the next run would convert
///
/// Only checks existence; never converts or writes. An existence check that
/// errors counts as pending.
pub async fn plan_groups(store: &ArtifactStore, groups: &[JobGroup]) -> Vec<PlannedJob> {
    let mut planned = Vec::new();
    for group in groups {
        for job in group.jobs() {
            let present = store
                .exists(&job.group, &job.identifier)
                .await
                .unwrap_or(false);
            planned.push(PlannedJob {
                group: job.group.clone(),
                identifier: job.identifier.clone(),
                artifact_path: store.artifact_path(&job.group, &job.identifier),
                status: if present {
                    PlanStatus::Present
                } else {
                    PlanStatus::Pending
                },
            });
        }
    }
    planned
}
