//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles YAML file discovery,
//! environment detection, override merging and secret expansion.

use super::error::{ConfigResult, ConfigurationError};
use super::NarratorConfig;
use crate::constants;
use serde_yaml::Value as YamlValue;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Loaded configuration together with where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: NarratorConfig,
    environment: String,
    config_directory: PathBuf,
    config_file: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory =
            config_dir.unwrap_or_else(|| PathBuf::from(constants::DEFAULT_CONFIG_DIRECTORY));

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config_file = Self::find_config_file(&config_directory)?;
        let mut config = Self::load_and_merge_config(&config_file, environment)?;
        Self::expand_environment_variables(&mut config);

        config.validate()?;

        debug!(
            "Configuration loaded successfully: {}",
            serde_json::to_string_pretty(&Self::sanitize_config_for_logging(&config))
                .unwrap_or_else(|_| "[serialization error]".to_string())
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
            config_file,
        }))
    }

    /// Wrap an in-memory configuration, validating it first
    pub fn from_config(mut config: NarratorConfig, environment: &str) -> ConfigResult<Self> {
        config.environment = environment.to_string();
        config.validate()?;
        Ok(Self {
            config,
            environment: environment.to_string(),
            config_directory: PathBuf::from(constants::DEFAULT_CONFIG_DIRECTORY),
            config_file: PathBuf::new(),
        })
    }

    /// Emit the configuration summary
    ///
    /// Loading usually happens before a subscriber exists, so callers log the
    /// outcome once logging is initialized.
    pub fn log_loaded(&self) {
        info!(
            environment = %self.environment,
            config_file = %self.config_file.display(),
            audio_directory = %self.config.output.audio_directory.display(),
            translation_directory = %self.config.output.translation_directory.display(),
            "Configuration loaded"
        );

        if self.config.synthesis.api_key.is_none() {
            warn!("synthesis.api_key is unset; speech synthesis is unavailable");
        }
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }

    /// Sanitized JSON view of the configuration with secrets masked
    pub fn debug_config(&self) -> serde_json::Value {
        Self::sanitize_config_for_logging(&self.config)
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Detect the active environment from `NARRATOR_ENV` / `APP_ENV`
    pub fn detect_environment() -> String {
        constants::ENVIRONMENT_VARIABLES
            .iter()
            .find_map(|name| env::var(name).ok().filter(|value| !value.trim().is_empty()))
            .unwrap_or_else(|| constants::DEFAULT_ENVIRONMENT.to_string())
    }

    /// Find the configuration file
    fn find_config_file(config_directory: &Path) -> ConfigResult<PathBuf> {
        let mut searched_paths = Vec::new();

        for name in constants::CONFIG_FILE_NAMES {
            let config_path = config_directory.join(name);
            searched_paths.push(config_path.clone());

            if config_path.exists() {
                debug!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        Err(ConfigurationError::config_file_not_found(searched_paths))
    }

    /// Safely read a configuration file with a size limit
    fn read_config_file_safely(path: &Path) -> ConfigResult<String> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))?;

        if metadata.len() > constants::MAX_CONFIG_FILE_SIZE {
            return Err(ConfigurationError::invalid_value(
                "file_size",
                metadata.len().to_string(),
                format!(
                    "Configuration file too large ({} bytes > {} bytes limit)",
                    metadata.len(),
                    constants::MAX_CONFIG_FILE_SIZE
                ),
            ));
        }

        std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))
    }

    /// Load and merge configuration with environment-specific overrides
    fn load_and_merge_config(
        config_file: &Path,
        environment: &str,
    ) -> ConfigResult<NarratorConfig> {
        let yaml_content = Self::read_config_file_safely(config_file)?;

        let mut yaml_data: YamlValue = serde_yaml::from_str(&yaml_content)
            .map_err(|e| ConfigurationError::invalid_yaml(config_file.display().to_string(), e))?;

        // An empty file parses as all defaults
        if yaml_data.is_null() {
            yaml_data = YamlValue::Mapping(Default::default());
        }

        if let Some(env_overrides) = yaml_data
            .get(YamlValue::String(environment.to_string()))
            .cloned()
        {
            debug!(
                "Applying environment-specific overrides for: {}",
                environment
            );
            Self::merge_yaml_values(&mut yaml_data, env_overrides);
        }

        if let YamlValue::Mapping(ref mut map) = yaml_data {
            for name in constants::KNOWN_ENVIRONMENTS {
                map.remove(YamlValue::String((*name).to_string()));
            }
            map.remove(YamlValue::String(environment.to_string()));
        }

        let mut config: NarratorConfig = serde_yaml::from_value(yaml_data).map_err(|e| {
            ConfigurationError::invalid_yaml(
                config_file.display().to_string(),
                format!("Failed to deserialize configuration: {e}"),
            )
        })?;

        config.environment = environment.to_string();

        Ok(config)
    }

    /// Recursively merge YAML values (environment overrides into base config)
    fn merge_yaml_values(base: &mut YamlValue, override_value: YamlValue) {
        match (&mut *base, override_value) {
            (YamlValue::Mapping(base_map), YamlValue::Mapping(override_map)) => {
                for (key, value) in override_map {
                    if let Some(existing_value) = base_map.get_mut(&key) {
                        Self::merge_yaml_values(existing_value, value);
                    } else {
                        base_map.insert(key, value);
                    }
                }
            }
            (base_ref, override_val) => {
                *base_ref = override_val;
            }
        }
    }

    /// Expand `${VAR}` placeholders in secret fields
    ///
    /// An unset variable leaves the field unset; backends that need the value
    /// report the missing key when they are built.
    fn expand_environment_variables(config: &mut NarratorConfig) {
        if let Some(key) = config.synthesis.api_key.take() {
            config.synthesis.api_key = match Self::expand_placeholder(&key) {
                Some(Ok(value)) => {
                    debug!("Expanded environment variable in synthesis.api_key");
                    Some(value)
                }
                Some(Err(var_name)) => {
                    warn!(
                        "Environment variable {} not found, synthesis.api_key left unset",
                        var_name
                    );
                    None
                }
                None if key.trim().is_empty() => None,
                None => Some(key),
            };
        }
    }

    /// `None` when `value` is not a placeholder, otherwise the lookup result
    /// (`Err` carries the missing variable name)
    fn expand_placeholder(value: &str) -> Option<Result<String, String>> {
        let var_name = value.strip_prefix("${")?.strip_suffix('}')?;
        Some(
            env::var(var_name)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| var_name.to_string()),
        )
    }

    fn sanitize_config_for_logging(config: &NarratorConfig) -> serde_json::Value {
        let mut value = serde_json::to_value(config).unwrap_or(serde_json::Value::Null);
        Self::sanitize_json_recursive(&mut value, constants::SENSITIVE_FIELD_PATTERNS);
        value
    }

    fn sanitize_json_recursive(value: &mut serde_json::Value, sensitive_patterns: &[&str]) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let lower = key.to_lowercase();
                    if sensitive_patterns.iter().any(|p| lower.contains(p)) {
                        if !val.is_null() {
                            *val = serde_json::Value::String("***REDACTED***".to_string());
                        }
                    } else {
                        Self::sanitize_json_recursive(val, sensitive_patterns);
                    }
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    Self::sanitize_json_recursive(item, sensitive_patterns);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_config_yaml() -> &'static str {
        r#"
output:
  audio_directory: "public/audio"
  audio_extension: "mp3"

synthesis:
  api_key: "${NARRATOR_LOADER_TEST_KEY}"
  default_voice: "24EI9FmmGvJruwUi7TJM"
  voices:
    de: "voice-de"
  request_timeout_seconds: "45"

translation:
  source_language: "de"
  languages:
    zh: "zh-CN"

test:
  output:
    audio_directory: "tmp/audio"

production:
  logging:
    level: "info"
    file_output: true
"#
    }

    fn setup_test_config_dir() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().to_path_buf();
        fs::write(
            config_dir.join("narrator-config.yaml"),
            create_test_config_yaml(),
        )
        .unwrap();
        (temp_dir, config_dir)
    }

    #[test]
    fn test_config_file_discovery() {
        let (_temp_dir, config_dir) = setup_test_config_dir();

        let config_file = ConfigManager::find_config_file(&config_dir).unwrap();
        assert_eq!(config_file.file_name().unwrap(), "narrator-config.yaml");
    }

    #[test]
    fn test_yml_extension_is_found() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("narrator-config.yml"),
            "synthesis:\n  default_voice: v\n",
        )
        .unwrap();

        let config_file = ConfigManager::find_config_file(temp_dir.path()).unwrap();
        assert_eq!(config_file.file_name().unwrap(), "narrator-config.yml");
    }

    #[test]
    fn test_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();

        let result = ConfigManager::find_config_file(temp_dir.path());

        if let Err(ConfigurationError::ConfigFileNotFound { searched_paths }) = result {
            assert_eq!(searched_paths.len(), 2);
        } else {
            panic!("Expected ConfigFileNotFound error");
        }
    }

    #[test]
    fn test_basic_config_loading() {
        let (_temp_dir, config_dir) = setup_test_config_dir();

        let manager =
            ConfigManager::load_from_directory_with_env(Some(config_dir), "development").unwrap();
        let config = manager.config();

        assert_eq!(manager.environment(), "development");
        assert_eq!(config.environment, "development");
        assert_eq!(config.output.audio_directory, PathBuf::from("public/audio"));
        assert_eq!(config.synthesis.voice_for("de"), "voice-de");
        assert_eq!(config.synthesis.voice_for("en"), "24EI9FmmGvJruwUi7TJM");
        assert_eq!(config.synthesis.request_timeout_seconds, 45);
        assert_eq!(config.translation.language_for("zh"), "zh-CN");
    }

    #[test]
    fn test_environment_specific_overrides() {
        let (_temp_dir, config_dir) = setup_test_config_dir();

        let test_manager =
            ConfigManager::load_from_directory_with_env(Some(config_dir.clone()), "test").unwrap();
        assert_eq!(
            test_manager.config().output.audio_directory,
            PathBuf::from("tmp/audio")
        );
        // Sibling keys of an overridden section survive the merge
        assert_eq!(test_manager.config().output.audio_extension, "mp3");

        let prod_manager =
            ConfigManager::load_from_directory_with_env(Some(config_dir), "production").unwrap();
        assert_eq!(prod_manager.config().logging.level.as_deref(), Some("info"));
        assert!(prod_manager.config().logging.file_output);
        assert_eq!(
            prod_manager.config().output.audio_directory,
            PathBuf::from("public/audio")
        );
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("narrator-config.yaml"),
            "synthesis: [unclosed",
        )
        .unwrap();

        let result = ConfigManager::load_from_directory_with_env(
            Some(temp_dir.path().to_path_buf()),
            "test",
        );
        assert!(matches!(result, Err(ConfigurationError::InvalidYaml { .. })));
    }

    #[test]
    fn test_validation_runs_on_load() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("narrator-config.yaml"), "output: {}\n").unwrap();

        let result = ConfigManager::load_from_directory_with_env(
            Some(temp_dir.path().to_path_buf()),
            "test",
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn test_placeholder_expansion() {
        assert_eq!(ConfigManager::expand_placeholder("plain-key"), None);
        assert_eq!(
            ConfigManager::expand_placeholder("${NARRATOR_SURELY_UNSET_VARIABLE}"),
            Some(Err("NARRATOR_SURELY_UNSET_VARIABLE".to_string()))
        );

        let mut config = NarratorConfig::default();
        config.synthesis.api_key = Some("${NARRATOR_SURELY_UNSET_VARIABLE}".to_string());
        ConfigManager::expand_environment_variables(&mut config);
        assert_eq!(config.synthesis.api_key, None);

        config.synthesis.api_key = Some("literal".to_string());
        ConfigManager::expand_environment_variables(&mut config);
        assert_eq!(config.synthesis.api_key.as_deref(), Some("literal"));
    }

    #[test]
    fn test_config_sanitization() {
        let mut config = NarratorConfig::default();
        config.synthesis.default_voice = "voice".to_string();
        config.synthesis.api_key = Some("super-secret".to_string());

        let manager = ConfigManager::from_config(config, "test").unwrap();
        let sanitized = manager.debug_config();

        assert_eq!(sanitized["synthesis"]["api_key"], "***REDACTED***");
        assert_eq!(sanitized["synthesis"]["default_voice"], "voice");
        assert!(!sanitized.to_string().contains("super-secret"));
    }
}
