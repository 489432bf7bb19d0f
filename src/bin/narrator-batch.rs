//! # Narrator Batch CLI
//!
//! Generates narration audio and translated string tables from job tables,
//! skipping every job whose artifact already exists. Re-running a command
//! resumes where the previous run stopped.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

use narrator_batch::config::ConfigManager;
use narrator_batch::logging::init_structured_logging;
use narrator_batch::models::select_groups;
use narrator_batch::orchestration::plan_groups;
use narrator_batch::{
    ArtifactStore, BatchConverter, BatchReport, Converter, ElevenLabsSynthesizer,
    GoogleTranslator, JobGroup, NarrationTable, NarratorConfig, PlanStatus, StringTable,
    TranslationTable,
};

#[derive(Parser)]
#[command(name = "narrator-batch")]
#[command(about = "Idempotent batch synthesis and translation of text tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration directory (default: config)
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,

    /// Environment (development, test, production); defaults to NARRATOR_ENV / APP_ENV
    #[arg(short, long, global = true)]
    environment: Option<String>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write the batch report as JSON to this path
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// Exit with status 2 when any job failed
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize narration audio for every job without an audio file
    Synthesize {
        /// Narration job table (YAML or JSON)
        #[arg(short, long)]
        jobs: PathBuf,

        /// Only process these groups (repeatable)
        #[arg(short, long)]
        group: Vec<String>,
    },

    /// Translate source texts into every target locale, then write string tables
    Translate {
        /// Translation job table (YAML or JSON)
        #[arg(short, long)]
        jobs: PathBuf,

        /// Only process these target locales (repeatable)
        #[arg(short, long)]
        group: Vec<String>,

        /// Skip writing the per-locale string tables
        #[arg(long)]
        no_table: bool,
    },

    /// List which jobs a run would convert, without calling any service
    Plan {
        /// Job table (YAML or JSON)
        #[arg(short, long)]
        jobs: PathBuf,

        /// Kind of job table
        #[arg(short, long, value_enum, default_value_t = Kind::Synthesis)]
        kind: Kind,

        /// Only consider these groups (repeatable)
        #[arg(short, long)]
        group: Vec<String>,
    },

    /// Rebuild string tables from existing translation artifacts
    Table {
        /// Translation job table (YAML or JSON)
        #[arg(short, long)]
        jobs: PathBuf,

        /// Only these target locales (repeatable)
        #[arg(short, long)]
        group: Vec<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Synthesis,
    Translation,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("❌ {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let environment = cli
        .environment
        .clone()
        .unwrap_or_else(ConfigManager::detect_environment);

    let manager =
        ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &environment)
            .context("loading configuration")?;
    let config = manager.config();

    let mut logging = config.logging.clone();
    match cli.verbose {
        0 => {}
        1 => logging.level = Some("debug".to_string()),
        _ => logging.level = Some("trace".to_string()),
    }
    let _log_guard = init_structured_logging(&logging, manager.environment());
    manager.log_loaded();

    match &cli.command {
        Commands::Synthesize { jobs, group } => {
            let groups = narration_groups(config, jobs, group)?;
            let converter: Arc<dyn Converter> = Arc::new(
                ElevenLabsSynthesizer::from_config(&config.synthesis)
                    .context("building speech synthesizer")?,
            );
            let driver = BatchConverter::new(audio_store(config), converter);
            let report = driver.run(&groups).await;
            finish(&cli, &report)
        }
        Commands::Translate {
            jobs,
            group,
            no_table,
        } => {
            let table = TranslationTable::load(jobs)?;
            let groups = select_groups(table.to_groups(&config.translation)?, group)?;
            let converter: Arc<dyn Converter> = Arc::new(
                GoogleTranslator::from_config(
                    &config.translation,
                    Some(table.source_language(&config.translation)),
                )
                .context("building translator")?,
            );
            let store = translation_store(config);
            let driver = BatchConverter::new(store.clone(), converter);
            let report = driver.run(&groups).await;
            let code = finish(&cli, &report)?;

            if !no_table {
                write_string_tables(config, &store, &groups).await?;
            }
            Ok(code)
        }
        Commands::Plan { jobs, kind, group } => {
            let (groups, store) = match kind {
                Kind::Synthesis => (narration_groups(config, jobs, group)?, audio_store(config)),
                Kind::Translation => {
                    let table = TranslationTable::load(jobs)?;
                    (
                        select_groups(table.to_groups(&config.translation)?, group)?,
                        translation_store(config),
                    )
                }
            };
            print_plan(store, &groups).await;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Table { jobs, group } => {
            let table = TranslationTable::load(jobs)?;
            let groups = select_groups(table.to_groups(&config.translation)?, group)?;
            write_string_tables(config, &translation_store(config), &groups).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn narration_groups(
    config: &NarratorConfig,
    jobs: &Path,
    names: &[String],
) -> Result<Vec<JobGroup>> {
    let table = NarrationTable::load(jobs)?;
    Ok(select_groups(table.to_groups(&config.synthesis)?, names)?)
}

fn audio_store(config: &NarratorConfig) -> ArtifactStore {
    ArtifactStore::new(
        &config.output.audio_directory,
        &config.output.audio_extension,
    )
}

fn translation_store(config: &NarratorConfig) -> ArtifactStore {
    ArtifactStore::new(
        &config.output.translation_directory,
        &config.output.translation_extension,
    )
}

async fn write_string_tables(
    config: &NarratorConfig,
    store: &ArtifactStore,
    groups: &[JobGroup],
) -> Result<()> {
    for group in groups {
        let table = StringTable::assemble(group, store).await?;
        let path = StringTable::default_path(&config.output.translation_directory, group.name());
        table.write_json(&path).await?;

        if table.is_complete() {
            println!("✅ {} → {}", group.name(), path.display());
        } else {
            println!(
                "⚠️  {} → {} ({} keys untranslated)",
                group.name(),
                path.display(),
                table.fallback_keys.len()
            );
        }
    }
    Ok(())
}

async fn print_plan(store: ArtifactStore, groups: &[JobGroup]) {
    let planned = plan_groups(&store, groups).await;

    for job in &planned {
        println!("  {job}");
    }

    let pending = planned
        .iter()
        .filter(|job| job.status == PlanStatus::Pending)
        .count();
    println!(
        "\n{} jobs: {} pending, {} already present",
        planned.len(),
        pending,
        planned.len() - pending
    );
}

fn finish(cli: &Cli, report: &BatchReport) -> Result<ExitCode> {
    if let Some(path) = &cli.report {
        write_report(path, report)?;
    }

    let summary = report.summary();
    for failure in report.failures() {
        println!("  ✗ {}/{}", failure.group, failure);
    }
    println!("\n🎉 Done: {summary}");

    if cli.strict && report.has_failures() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn write_report(path: &Path, report: &BatchReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("serializing batch report")?;
    std::fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}
