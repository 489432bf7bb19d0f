//! # Data Model
//!
//! - [`job`] - conversion jobs and job groups
//! - [`job_table`] - loading job groups from YAML/JSON tables
//! - [`outcome`] - per-job outcomes and batch reports

pub mod job;
pub mod job_table;
pub mod outcome;

pub use job::{ConversionJob, JobGroup, JobGroupError};
pub use job_table::{select_groups, NarrationGroupSpec, NarrationTable, TranslationTable};
pub use outcome::{
    BatchReport, BatchSummary, FailureStage, GroupReport, JobOutcome, JobRecord, PlanStatus,
    PlannedJob,
};
