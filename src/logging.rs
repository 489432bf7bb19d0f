//! # Structured Logging Module
//!
//! Environment-aware structured logging to the console and, optionally, to a
//! JSON log file per process. Batch runs emit one event per job and one
//! summary event.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

use crate::config::LoggingConfig;
use crate::models::{BatchReport, JobOutcome, JobRecord};

/// Initialize structured logging with environment-specific configuration.
///
/// Returns the file writer guard when file output is enabled; keep it alive
/// for the lifetime of the process so buffered lines are flushed. Calling
/// this when a global subscriber already exists is a no-op.
pub fn init_structured_logging(config: &LoggingConfig, environment: &str) -> Option<WorkerGuard> {
    let log_level = config
        .level
        .clone()
        .unwrap_or_else(|| get_log_level(environment).to_string());

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .with_filter(build_filter(&log_level));

    let (file_layer, guard, log_path) = if config.file_output {
        match prepare_log_file(&config.directory, environment) {
            Ok((dir, file_name)) => {
                let appender = tracing_appender::rolling::never(&dir, &file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(build_filter(&log_level));
                (Some(layer), Some(guard), Some(dir.join(file_name)))
            }
            Err(e) => {
                eprintln!(
                    "Could not create log directory {}: {e}; continuing with console logging only",
                    config.directory.display()
                );
                (None, None, None)
            }
        }
    } else {
        (None, None, None)
    };

    let initialized = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if !initialized {
        tracing::debug!(
            "Global tracing subscriber already initialized - continuing with existing subscriber"
        );
        return None;
    }

    tracing::info!(
        pid = process::id(),
        environment = %environment,
        level = %log_level,
        log_file = ?log_path.as_ref().map(|p| p.display().to_string()),
        "Structured logging initialized"
    );

    guard
}

/// `RUST_LOG` wins over the configured level when set
fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

fn prepare_log_file(directory: &Path, environment: &str) -> std::io::Result<(PathBuf, String)> {
    fs::create_dir_all(directory)?;
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let file_name = format!("{}.{}.{}.log", environment, process::id(), timestamp);
    Ok((directory.to_path_buf(), file_name))
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log one job outcome
pub fn log_job_outcome(run_id: Uuid, record: &JobRecord) {
    match &record.outcome {
        JobOutcome::AlreadyPresent | JobOutcome::Succeeded { .. } => tracing::info!(
            run_id = %run_id,
            group = %record.group,
            identifier = %record.identifier,
            outcome = record.outcome.label(),
            path = %record.artifact_path.display(),
            "{}",
            record
        ),
        JobOutcome::Failed { stage, detail } => tracing::warn!(
            run_id = %run_id,
            group = %record.group,
            identifier = %record.identifier,
            outcome = record.outcome.label(),
            stage = stage.as_str(),
            error = %detail,
            "{}",
            record
        ),
    }
}

/// Log the final summary of a batch
pub fn log_batch_summary(report: &BatchReport) {
    let summary = report.summary();
    tracing::info!(
        run_id = %report.run_id,
        converter = %report.converter,
        total = summary.total,
        skipped = summary.skipped,
        succeeded = summary.succeeded,
        failed = summary.failed,
        duration_ms = report.duration().num_milliseconds(),
        finished_at = %report.finished_at.to_rfc3339(),
        "Batch finished: {}",
        summary
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_log_file_naming() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("log");

        let (created_dir, file_name) = prepare_log_file(&log_dir, "test").unwrap();

        assert!(created_dir.is_dir());
        assert!(file_name.starts_with(&format!("test.{}.", process::id())));
        assert!(file_name.ends_with(".log"));
    }
}
