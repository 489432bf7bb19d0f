//! # System Constants
//!
//! Defaults and fixed names shared by the configuration layer, the conversion
//! backends and the CLI.

/// Environment variables consulted (in order) to pick the configuration environment
pub const ENVIRONMENT_VARIABLES: &[&str] = &["NARRATOR_ENV", "APP_ENV"];
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const KNOWN_ENVIRONMENTS: &[&str] = &["development", "test", "production"];

pub const CONFIG_FILE_NAMES: &[&str] = &["narrator-config.yaml", "narrator-config.yml"];
pub const DEFAULT_CONFIG_DIRECTORY: &str = "config";
pub const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub mod output {
    pub const AUDIO_DIRECTORY: &str = "public/audio";
    pub const AUDIO_EXTENSION: &str = "mp3";
    pub const TRANSLATION_DIRECTORY: &str = "translations";
    pub const TRANSLATION_EXTENSION: &str = "txt";
    /// Suffix of the sibling file an artifact is written to before being renamed into place
    pub const PARTIAL_SUFFIX: &str = "partial";
}

pub mod synthesis {
    pub const PROVIDER: &str = "elevenlabs";
    pub const BASE_URL: &str = "https://api.elevenlabs.io";
    pub const MODEL_ID: &str = "eleven_multilingual_v2";
    pub const API_KEY_PLACEHOLDER: &str = "${ELEVEN_API_KEY}";
    pub const API_KEY_HEADER: &str = "xi-api-key";
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 60;
}

pub mod translation {
    pub const PROVIDER: &str = "google";
    pub const BASE_URL: &str = "https://translate.googleapis.com";
    pub const SOURCE_LANGUAGE: &str = "de";
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
}

pub mod logging {
    pub const LOG_DIRECTORY: &str = "log";
}

/// Field-name fragments masked by [`crate::config::ConfigManager::debug_config`]
pub const SENSITIVE_FIELD_PATTERNS: &[&str] = &["api_key", "token", "secret", "password"];
