//! # Job Tables
//!
//! Job tables are the text inputs of a batch, loaded from YAML or JSON files
//! at process start and turned into [`JobGroup`]s. Two shapes exist:
//!
//! ```yaml
//! # Narration table: one group per locale, each with its own texts
//! groups:
//!   en:
//!     parameter: "24EI9FmmGvJruwUi7TJM"   # optional voice override
//!     jobs:
//!       narrator_close_eyes: "All villagers, please close your eyes now."
//! ```
//!
//! ```yaml
//! # Translation table: one source text set fanned out to every target
//! source_language: de
//! targets:
//!   zh: zh-CN       # provider language code
//!   fr: ~           # same as the locale
//! texts:
//!   confirm: "Bestätigen"
//! ```
//!
//! Map order in the file is the processing order.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::job::JobGroup;
use crate::config::{SynthesisConfig, TranslationConfig};
use crate::error::{BatchError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NarrationTable {
    #[serde(default)]
    pub groups: IndexMap<String, NarrationGroupSpec>,

    #[serde(skip)]
    source: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NarrationGroupSpec {
    /// Voice id; falls back to the configured voice for the group
    #[serde(default)]
    pub parameter: Option<String>,
    #[serde(default)]
    pub jobs: IndexMap<String, String>,
}

impl NarrationTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut table: Self = read_table(path)?;
        table.source = path.to_path_buf();
        debug!(
            path = %path.display(),
            groups = table.groups.len(),
            "Loaded narration table"
        );
        Ok(table)
    }

    /// Build job groups, resolving each group's voice
    pub fn to_groups(&self, synthesis: &SynthesisConfig) -> Result<Vec<JobGroup>> {
        self.groups
            .iter()
            .map(|(name, spec)| {
                let voice = spec
                    .parameter
                    .as_deref()
                    .unwrap_or_else(|| synthesis.voice_for(name));
                JobGroup::from_entries(name.as_str(), voice, &spec.jobs)
                    .map_err(|e| BatchError::job_table(&self.source, e))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationTable {
    /// Overrides `translation.source_language` from the configuration
    #[serde(default)]
    pub source_language: Option<String>,
    /// Target locale → provider language code (`null` means the locale itself)
    #[serde(default)]
    pub targets: IndexMap<String, Option<String>>,
    #[serde(default)]
    pub texts: IndexMap<String, String>,

    #[serde(skip)]
    source: PathBuf,
}

impl TranslationTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut table: Self = read_table(path)?;
        table.source = path.to_path_buf();
        debug!(
            path = %path.display(),
            targets = table.targets.len(),
            texts = table.texts.len(),
            "Loaded translation table"
        );
        Ok(table)
    }

    pub fn source_language<'a>(&'a self, translation: &'a TranslationConfig) -> &'a str {
        self.source_language
            .as_deref()
            .unwrap_or(&translation.source_language)
    }

    /// One group per target locale, every group carrying the full text set
    pub fn to_groups(&self, translation: &TranslationConfig) -> Result<Vec<JobGroup>> {
        self.targets
            .iter()
            .map(|(locale, code)| {
                let language = code
                    .as_deref()
                    .unwrap_or_else(|| translation.language_for(locale));
                JobGroup::from_entries(locale.as_str(), language, &self.texts)
                    .map_err(|e| BatchError::job_table(&self.source, e))
            })
            .collect()
    }
}

/// Keep only the named groups, in the table's order
///
/// An empty selection keeps every group; an unknown name is an error.
pub fn select_groups(groups: Vec<JobGroup>, names: &[String]) -> Result<Vec<JobGroup>> {
    if names.is_empty() {
        return Ok(groups);
    }

    if let Some(unknown) = names
        .iter()
        .find(|name| !groups.iter().any(|g| g.name() == name.as_str()))
    {
        return Err(BatchError::UnknownGroup {
            group: unknown.clone(),
            available: groups.iter().map(|g| g.name().to_string()).collect(),
        });
    }

    Ok(groups
        .into_iter()
        .filter(|g| names.iter().any(|name| name == g.name()))
        .collect())
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| BatchError::io(format!("reading job table {}", path.display()), e))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&contents).map_err(|e| BatchError::job_table(path, e))
    } else {
        serde_yaml::from_str(&contents).map_err(|e| BatchError::job_table(path, e))
    }
}
