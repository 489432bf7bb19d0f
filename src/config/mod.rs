//! # Narrator Configuration System
//!
//! YAML-based, environment-aware configuration for the batch driver and its
//! conversion backends.
//!
//! ## Architecture
//!
//! - **Single Source of Truth**: settings come from `narrator-config.yaml`
//! - **Environment Awareness**: `development`/`test`/`production` sections override the base
//! - **Explicit Validation**: invalid values are rejected before any batch starts
//! - **Secrets from the environment**: `${VAR}` placeholders in API keys are expanded at load
//!
//! Job tables (the text to convert) are *not* part of this configuration; they
//! are loaded separately by [`crate::models::job_table`] and passed to the driver.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use narrator_batch::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let voice = manager.config().synthesis.voice_for("en");
//! let audio_root = &manager.config().output.audio_directory;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants;
use crate::utils::serde::deserialize_seconds;
use crate::validation::{validate_extension, validate_path_segment};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring narrator-config.yaml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Where artifacts are written
    pub output: OutputConfig,

    /// Text-to-speech backend settings
    pub synthesis: SynthesisConfig,

    /// Machine-translation backend settings
    pub translation: TranslationConfig,

    /// Console and file logging
    pub logging: LoggingConfig,

    /// Environment the configuration was resolved for (set by the loader)
    #[serde(skip)]
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub audio_directory: PathBuf,
    pub audio_extension: String,
    pub translation_directory: PathBuf,
    pub translation_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            audio_directory: PathBuf::from(constants::output::AUDIO_DIRECTORY),
            audio_extension: constants::output::AUDIO_EXTENSION.to_string(),
            translation_directory: PathBuf::from(constants::output::TRANSLATION_DIRECTORY),
            translation_extension: constants::output::TRANSLATION_EXTENSION.to_string(),
        }
    }
}

/// Text-to-speech settings
///
/// `voices` maps a group (locale) to a provider voice id. Groups without an
/// entry fall back to `default_voice`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub provider: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model_id: String,
    pub output_format: Option<String>,
    pub default_voice: String,
    pub voices: IndexMap<String, String>,
    #[serde(deserialize_with = "deserialize_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            provider: constants::synthesis::PROVIDER.to_string(),
            base_url: constants::synthesis::BASE_URL.to_string(),
            api_key: Some(constants::synthesis::API_KEY_PLACEHOLDER.to_string()),
            model_id: constants::synthesis::MODEL_ID.to_string(),
            output_format: None,
            default_voice: String::new(),
            voices: IndexMap::new(),
            request_timeout_seconds: constants::synthesis::REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl SynthesisConfig {
    /// Voice id for a group, falling back to the default voice
    pub fn voice_for(&self, group: &str) -> &str {
        self.voices
            .get(group)
            .map(String::as_str)
            .unwrap_or(&self.default_voice)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Machine-translation settings
///
/// `languages` maps a target locale (group name) to the provider's language
/// code when the two differ, e.g. `zh: zh-CN`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub provider: String,
    pub base_url: String,
    pub source_language: String,
    pub languages: IndexMap<String, String>,
    #[serde(deserialize_with = "deserialize_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: constants::translation::PROVIDER.to_string(),
            base_url: constants::translation::BASE_URL.to_string(),
            source_language: constants::translation::SOURCE_LANGUAGE.to_string(),
            languages: IndexMap::new(),
            request_timeout_seconds: constants::translation::REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl TranslationConfig {
    /// Provider language code for a target locale; the locale itself when unmapped
    pub fn language_for<'a>(&'a self, locale: &'a str) -> &'a str {
        self.languages.get(locale).map(String::as_str).unwrap_or(locale)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Overrides the environment-derived level (`debug`, `info`, ...)
    pub level: Option<String>,
    /// Also write JSON logs to `directory`
    pub file_output: bool,
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            file_output: false,
            directory: PathBuf::from(constants::logging::LOG_DIRECTORY),
        }
    }
}

impl NarratorConfig {
    /// Validate configuration values that would otherwise fail mid-batch
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, extension) in [
            ("output.audio_extension", &self.output.audio_extension),
            ("output.translation_extension", &self.output.translation_extension),
        ] {
            validate_extension(extension)
                .map_err(|reason| ConfigurationError::invalid_value(field, extension, reason))?;
        }

        for (field, url) in [
            ("synthesis.base_url", &self.synthesis.base_url),
            ("translation.base_url", &self.translation.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigurationError::invalid_value(
                    field,
                    url,
                    "must be an http(s) URL",
                ));
            }
        }

        for (field, seconds) in [
            (
                "synthesis.request_timeout_seconds",
                self.synthesis.request_timeout_seconds,
            ),
            (
                "translation.request_timeout_seconds",
                self.translation.request_timeout_seconds,
            ),
        ] {
            if seconds == 0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    "0",
                    "timeout must be greater than zero",
                ));
            }
        }

        if self.synthesis.default_voice.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "default_voice",
                "synthesis",
            ));
        }

        if self.synthesis.model_id.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "model_id",
                "synthesis",
            ));
        }

        if self.translation.source_language.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "source_language",
                "translation",
            ));
        }

        for group in self
            .synthesis
            .voices
            .keys()
            .chain(self.translation.languages.keys())
        {
            validate_path_segment(group).map_err(|reason| {
                ConfigurationError::invalid_value("group", group.as_str(), reason)
            })?;
        }

        Ok(())
    }
}
