#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Narrator Batch
//!
//! Idempotent, resumable batch conversion of text tables into artifacts:
//! narration audio through a text-to-speech service and localized string
//! tables through a machine-translation service.
//!
//! ## Overview
//!
//! A batch is a list of [`JobGroup`]s. Every job in a group is converted by
//! an external [`Converter`] and stored at a deterministic path in an
//! [`ArtifactStore`]. A job whose artifact already exists is skipped without
//! calling the converter, so an interrupted or partially failed batch is
//! resumed simply by running it again.
//!
//! ## Module Organization
//!
//! - [`orchestration`] - the batch driver
//! - [`conversion`] - the converter trait and HTTP backends
//! - [`artifacts`] - on-disk artifact store
//! - [`models`] - jobs, groups, job tables and reports
//! - [`translation`] - localized string tables
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - structured logging setup and batch log events
//! - [`error`] - error types outside the per-job outcome model
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use narrator_batch::{ArtifactStore, BatchConverter, FnConverter, JobGroup};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let group = JobGroup::from_entries("en", "voice-id", [("greeting", "Hello")])?;
//! let converter = FnConverter::new("fixed", |_: &str, _: &str| Ok(b"AUDIO1".to_vec()));
//! let driver = BatchConverter::new(ArtifactStore::new("public/audio", "mp3"), Arc::new(converter));
//!
//! let report = driver.run(&[group]).await;
//! for record in report.records() {
//!     println!("{record}");
//! }
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod translation;
pub mod utils;
pub mod validation;

pub use artifacts::ArtifactStore;
pub use config::{ConfigManager, ConfigurationError, NarratorConfig};
pub use conversion::{
    ConversionError, Converter, ElevenLabsSynthesizer, FnConverter, GoogleTranslator,
};
pub use error::{BatchError, Result};
pub use models::{
    BatchReport, BatchSummary, ConversionJob, FailureStage, GroupReport, JobGroup, JobOutcome,
    JobRecord, NarrationTable, PlanStatus, PlannedJob, TranslationTable,
};
pub use orchestration::BatchConverter;
pub use translation::StringTable;
