//! SquadUp configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Main SquadUp configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text-generation provider configuration
    pub llm: LlmConfig,

    /// Events-search provider configuration
    pub events: EventsConfig,

    /// Planning session limits and timings
    pub session: SessionConfig,

    /// Clipboard command configuration
    pub clipboard: ClipboardConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the text-generation key resolves. The events key is
    /// optional: without it plans carry no events.
    pub fn validate(&self) -> Result<()> {
        debug!("validate: called");
        self.llm.get_api_key().context("LLM API key not found")?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed: a broken config file is reported later by `load`.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => Some(p.clone()),
            None => Self::candidate_paths().into_iter().find(|p| p.exists()),
        }?;
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    /// Project-local `.squadup.yml`, then `~/.config/squadup/squadup.yml`
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".squadup.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("squadup").join("squadup.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Resolve an API key from an environment variable, falling back to a file
fn resolve_api_key(env_name: &str, file: Option<&PathBuf>) -> Result<String> {
    debug!(%env_name, ?file, "resolve_api_key: called");
    if let Ok(key) = std::env::var(env_name)
        && !key.trim().is_empty()
    {
        debug!("resolve_api_key: found in environment");
        return Ok(key.trim().to_string());
    }

    if let Some(path) = file {
        debug!(path = %path.display(), "resolve_api_key: reading key file");
        let key = fs::read_to_string(path).context(format!("Failed to read API key file {}", path.display()))?;
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    Err(eyre::eyre!("Set the {} environment variable or configure an api-key-file", env_name))
}

/// Text-generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (only "gemini" is supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Optional file containing the API key
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

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
    /// Resolve the API key from the environment or key file
    pub fn get_api_key(&self) -> Result<String> {
        resolve_api_key(&self.api_key_env, self.api_key_file.as_ref())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key_file: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 1024,
            timeout_ms: 30_000,
        }
    }
}

/// Events-search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Optional file containing the API key
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Results per request; provider default when unset
    #[serde(rename = "page-size")]
    pub page_size: Option<u32>,
}

impl EventsConfig {
    /// Resolve the API key from the environment or key file
    pub fn get_api_key(&self) -> Result<String> {
        resolve_api_key(&self.api_key_env, self.api_key_file.as_ref())
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://app.ticketmaster.com".to_string(),
            api_key_env: "TICKETMASTER_API_KEY".to_string(),
            api_key_file: None,
            timeout_ms: 10_000,
            page_size: None,
        }
    }
}

/// Planning session limits and timings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum bookable events kept for the query
    #[serde(rename = "max-suggestion-events")]
    pub max_suggestion_events: usize,

    /// Number of venues in the ranking
    #[serde(rename = "top-venues")]
    pub top_venues: usize,

    /// How long the "copied" indicator stays set, in milliseconds
    #[serde(rename = "share-indicator-ms")]
    pub share_indicator_ms: u64,

    /// Digest shown when suggestions could not be generated
    #[serde(rename = "generation-error-message")]
    pub generation_error_message: String,
}

impl SessionConfig {
    pub fn share_indicator(&self) -> Duration {
        Duration::from_millis(self.share_indicator_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_suggestion_events: 5,
            top_venues: 3,
            share_indicator_ms: 3_000,
            generation_error_message: "Sorry, we couldn't come up with suggestions right now. Please try again."
                .to_string(),
        }
    }
}

/// Clipboard command configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Command and arguments that read the text from stdin; autodetected when unset
    pub command: Option<Vec<String>>,
}
