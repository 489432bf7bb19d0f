//! # Job Outcomes and Batch Reports
//!
//! Every job attempted by the driver yields exactly one [`JobRecord`]. Records
//! are collected per group into a [`GroupReport`] and per run into a
//! [`BatchReport`], so callers can assert on outcomes instead of scraping logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Which side of the job failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The external conversion call returned an error
    Conversion,
    /// The artifact could not be written
    Persistence,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Conversion => "conversion",
            FailureStage::Persistence => "persistence",
        }
    }
}

/// Result of processing one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    /// Artifact existed before the job was reached; no call was made
    AlreadyPresent,
    /// Converted and persisted
    Succeeded { bytes_written: usize },
    /// Conversion or persistence failed; no artifact was created
    Failed { stage: FailureStage, detail: String },
}

impl JobOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, JobOutcome::AlreadyPresent)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobOutcome::Failed { .. })
    }

    /// Short label used in structured log fields
    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::AlreadyPresent => "skipped",
            JobOutcome::Succeeded { .. } => "succeeded",
            JobOutcome::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::AlreadyPresent => write!(f, "already present"),
            JobOutcome::Succeeded { .. } => write!(f, "succeeded"),
            JobOutcome::Failed { detail, .. } => write!(f, "failed: {detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub group: String,
    pub identifier: String,
    pub artifact_path: PathBuf,
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

impl fmt::Display for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identifier, self.outcome)
    }
}

/// Outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &JobOutcome) {
        self.total += 1;
        match outcome {
            JobOutcome::AlreadyPresent => self.skipped += 1,
            JobOutcome::Succeeded { .. } => self.succeeded += 1,
            JobOutcome::Failed { .. } => self.failed += 1,
        }
    }

    fn merge(&mut self, other: BatchSummary) {
        self.total += other.total;
        self.skipped += other.skipped;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} jobs: {} succeeded, {} already present, {} failed",
            self.total, self.succeeded, self.skipped, self.failed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    pub group: String,
    pub parameter: String,
    pub records: Vec<JobRecord>,
}

impl GroupReport {
    pub fn new(group: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            parameter: parameter.into(),
            records: Vec::new(),
        }
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for record in &self.records {
            summary.record(&record.outcome);
        }
        summary
    }

    pub fn record(&self, identifier: &str) -> Option<&JobRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub converter: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub groups: Vec<GroupReport>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for group in &self.groups {
            summary.merge(group.summary());
        }
        summary
    }

    /// All records across groups, in processing order
    pub fn records(&self) -> impl Iterator<Item = &JobRecord> {
        self.groups.iter().flat_map(|g| g.records.iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobRecord> {
        self.records().filter(|r| r.outcome.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn group(&self, name: &str) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.group == name)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Whether a job would be converted by the next run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Pending,
    Present,
}

/// Dry-run view of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedJob {
    pub group: String,
    pub identifier: String,
    pub artifact_path: PathBuf,
    pub status: PlanStatus,
}

impl fmt::Display for PlannedJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            PlanStatus::Pending => "pending",
            PlanStatus::Present => "already present",
        };
        write!(f, "{}/{}: {}", self.group, self.identifier, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(identifier: &str, outcome: JobOutcome) -> JobRecord {
        JobRecord {
            group: "en".to_string(),
            identifier: identifier.to_string(),
            artifact_path: PathBuf::from(format!("out/en/{identifier}.mp3")),
            outcome,
        }
    }

    #[test]
    fn test_record_display_lines() {
        assert_eq!(
            record("greeting", JobOutcome::Succeeded { bytes_written: 6 }).to_string(),
            "greeting: succeeded"
        );
        assert_eq!(
            record("greeting", JobOutcome::AlreadyPresent).to_string(),
            "greeting: already present"
        );
        assert_eq!(
            record(
                "x",
                JobOutcome::Failed {
                    stage: FailureStage::Conversion,
                    detail: "quota exceeded".to_string(),
                }
            )
            .to_string(),
            "x: failed: quota exceeded"
        );
    }

    #[test]
    fn test_summary_counts_across_groups() {
        let now = Utc::now();
        let mut en = GroupReport::new("en", "voice-en");
        en.records.push(record("a", JobOutcome::AlreadyPresent));
        en.records
            .push(record("b", JobOutcome::Succeeded { bytes_written: 3 }));
        let mut de = GroupReport::new("de", "voice-de");
        de.records.push(record(
            "c",
            JobOutcome::Failed {
                stage: FailureStage::Persistence,
                detail: "disk full".to_string(),
            },
        ));

        let report = BatchReport {
            run_id: Uuid::new_v4(),
            converter: "test".to_string(),
            started_at: now,
            finished_at: now,
            groups: vec![en, de],
        };

        let summary = report.summary();
        assert_eq!(
            summary,
            BatchSummary {
                total: 3,
                skipped: 1,
                succeeded: 1,
                failed: 1,
            }
        );
        assert_eq!(
            summary.to_string(),
            "3 jobs: 1 succeeded, 1 already present, 1 failed"
        );
        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.records().count(), 3);
        assert!(report.group("de").is_some());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(record(
            "x",
            JobOutcome::Failed {
                stage: FailureStage::Conversion,
                detail: "boom".to_string(),
            },
        ))
        .unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["stage"], "conversion");
        assert_eq!(json["identifier"], "x");
    }
}
