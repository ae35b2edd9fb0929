//! Configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Storage paths
    pub storage: StorageConfig,

    /// UI defaults
    pub ui: UiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Explicit path > `./.dayplan.yml` > `~/.config/dayplan/dayplan.yml` >
    /// defaults. Unparseable discovered files log a warning and fall through.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(".dayplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("dayplan").join("dayplan.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Whether the LLM credential is present in the environment
    ///
    /// Absence disables the generation action rather than erroring at call
    /// time.
    pub fn credential_available(&self) -> bool {
        std::env::var(&self.llm.api_key_env).is_ok_and(|v| !v.trim().is_empty())
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "gemini" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        let key = std::env::var(&self.api_key_env)
            .with_context(|| format!("API key not found. Set the {} environment variable.", self.api_key_env))?;
        if key.trim().is_empty() {
            return Err(eyre::eyre!("The {} environment variable is empty", self.api_key_env));
        }
        Ok(key)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 60_000,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the task file and planning-log files
    #[serde(rename = "data-dir")]
    pub data_dir: String,
}

impl StorageConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Fixed path of the persisted task list
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir().join("tasks.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join("dayplan"))
            .unwrap_or_else(|| PathBuf::from(".dayplan"))
            .to_string_lossy()
            .into_owned();

        Self { data_dir }
    }
}

/// UI defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Default window start time
    #[serde(rename = "window-start")]
    pub window_start: String,

    /// Default window end time
    #[serde(rename = "window-end")]
    pub window_end: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_start: "09:00".to_string(),
            window_end: "17:00".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.ui.window_start, "09:00");
        assert_eq!(config.ui.window_end, "17:00");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: gemini
  model: gemini-2.5-pro
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 4096
  timeout-ms: 30000

storage:
  data-dir: /tmp/dayplan-test

ui:
  window-start: "08:00"
  window-end: "16:30"
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.storage.data_dir, "/tmp/dayplan-test");
        assert_eq!(config.ui.window_start, "08:00");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gemini-2.5-flash
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.ui.window_end, "17:00");
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig {
            data_dir: "/tmp/dp".to_string(),
        };
        assert_eq!(storage.tasks_path(), PathBuf::from("/tmp/dp/tasks.json"));
    }

    #[test]
    #[serial]
    fn test_credential_available() {
        let mut config = Config::default();
        config.llm.api_key_env = "DAYPLAN_TEST_KEY".to_string();

        unsafe { std::env::remove_var("DAYPLAN_TEST_KEY") };
        assert!(!config.credential_available());
        assert!(config.llm.api_key().is_err());

        unsafe { std::env::set_var("DAYPLAN_TEST_KEY", "secret") };
        assert!(config.credential_available());
        assert_eq!(config.llm.api_key().unwrap(), "secret");

        unsafe { std::env::remove_var("DAYPLAN_TEST_KEY") };
    }

    #[test]
    #[serial]
    fn test_empty_credential_counts_as_missing() {
        let mut config = Config::default();
        config.llm.api_key_env = "DAYPLAN_TEST_EMPTY_KEY".to_string();

        unsafe { std::env::set_var("DAYPLAN_TEST_EMPTY_KEY", "  ") };
        assert!(!config.credential_available());
        assert!(config.llm.api_key().is_err());

        unsafe { std::env::remove_var("DAYPLAN_TEST_EMPTY_KEY") };
    }
}
