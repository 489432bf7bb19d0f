//! # Orchestration
//!
//! The batch driver: sequential, idempotent conversion of job groups with
//! per-job outcome reporting.
//!
//! ## Core Components
//!
//! - **BatchConverter**: runs groups through a converter into an artifact store
//! - **plan_groups**: dry-run existence check over the same groups
//!
//! ## Flow
//!
//! ```text
//! job table → existence check → conversion call → artifact persisted → log line
//! ```

pub mod batch_converter;

pub use batch_converter::{plan_groups, BatchConverter};
