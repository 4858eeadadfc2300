//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/ghwrapped/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/ghwrapped/` (~/.config/ghwrapped/)
//! - State/Logs: `$XDG_STATE_HOME/ghwrapped/` (~/.local/state/ghwrapped/)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "ghwrapped";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// GitHub GraphQL access
    #[serde(default)]
    pub github: GitHubConfig,

    /// Narrative generation endpoint
    #[serde(default)]
    pub llm: LlmConfig,

    /// Profile engine options
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub GraphQL client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GitHubConfig {
    /// Personal access token (falls back to `GITHUB_TOKEN`)
    pub token: Option<String>,

    /// GraphQL endpoint
    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_github_timeout")]
    pub timeout_secs: u64,

    /// Max retry attempts for transient failures
    #[serde(default = "default_github_max_retries")]
    pub max_retries: usize,

    /// Safety cap on nodes gathered by a single paginated query
    #[serde(default = "default_github_max_nodes")]
    pub max_nodes: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_github_api_url(),
            timeout_secs: default_github_timeout(),
            max_retries: default_github_max_retries(),
            max_nodes: default_github_max_nodes(),
        }
    }
}

impl GitHubConfig {
    /// Token from config, then from the `GITHUB_TOKEN` environment variable.
    pub fn resolved_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(Error::Config("github.api_url must not be empty".to_string()));
        }
        if self.max_nodes == 0 {
            return Err(Error::Config(
                "github.max_nodes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_github_api_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_github_timeout() -> u64 {
    30
}

fn default_github_max_retries() -> usize {
    3
}

fn default_github_max_nodes() -> usize {
    2000
}

/// Output language for generated narratives
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeLanguage {
    #[default]
    En,
    Zh,
}

impl NarrativeLanguage {
    /// Short language code as used in config files and on the command line.
    pub fn code(&self) -> &'static str {
        match self {
            NarrativeLanguage::En => "en",
            NarrativeLanguage::Zh => "zh",
        }
    }

    /// Parse a language code; unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => NarrativeLanguage::Zh,
            _ => NarrativeLanguage::En,
        }
    }
}

/// OpenAI-compatible chat completions endpoint used for narratives
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub base_url: Option<String>,
    /// API key (falls back to `OPENAI_API_KEY`)
    pub api_key: Option<String>,
    /// Model to use
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Narrative output language
    #[serde(default)]
    pub language: NarrativeLanguage,
    /// HTTP request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: default_llm_model(),
            language: NarrativeLanguage::default(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    /// API key from config, then from the `OPENAI_API_KEY` environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Check that both endpoint and key are available
    pub fn is_ready(&self) -> bool {
        self.base_url
            .as_deref()
            .map_or(false, |u| !u.trim().is_empty())
            && self.resolved_api_key().is_some()
    }
}

fn default_llm_model() -> String {
    "gpt-4o".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

/// Profile engine options
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProfileConfig {
    /// Offset from UTC, in minutes, used to bucket activity by local hour.
    /// `None` means "use the host's current offset".
    pub utc_offset_minutes: Option<i32>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.github.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/ghwrapped/config.toml` (~/.config/ghwrapped/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join(APP_DIR).join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/ghwrapped/` (~/.local/state/ghwrapped/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join(APP_DIR)
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/ghwrapped/ghwrapped.log` (~/.local/state/ghwrapped/ghwrapped.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("ghwrapped.log")
    }
}
