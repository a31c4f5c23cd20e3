//! Configuration loading, validation, and management for GitTeach.
//!
//! Loads configuration from `~/.gitteach/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! The tool catalog lives here too: tool ids, trigger hints, and parameter
//! schemas are configuration data, not code. Components receive the catalog
//! as an explicit immutable object at construction, so tests can substitute
//! fixture catalogs without touching shared state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gitteach_core::catalog::{ParamSpec, ToolCatalog, ToolDescriptor};

/// The root configuration structure.
///
/// Maps directly to `~/.gitteach/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Agent pipeline settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// GitHub toolbox settings
    #[serde(default)]
    pub github: GithubConfig,

    /// The tool catalog
    #[serde(default, rename = "tools")]
    pub tools: Vec<ToolEntry>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend", &self.backend)
            .field("agent", &self.agent)
            .field("github", &self.github)
            .field("tools", &self.tools)
            .finish()
    }
}

/// Completion backend configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key (local servers typically need none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8000/v1".into()
}
fn default_model() -> String {
    "lfm2.5".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Agent pipeline configuration.
///
/// Router and constructor temperatures are not configurable: deterministic
/// classification requires 0.0 and a different value would be a correctness
/// bug, not a tuning choice. Only the responder temperature is exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Responder sampling temperature (naturalness over determinism)
    #[serde(default = "default_responder_temperature")]
    pub responder_temperature: f32,

    /// Maximum character budget for a responder reply
    #[serde(default = "default_max_reply_chars")]
    pub max_reply_chars: usize,

    /// Canned reply for turns routed to chat
    #[serde(default = "default_chat_reply")]
    pub chat_reply: String,
}

fn default_responder_temperature() -> f32 {
    0.7
}
fn default_max_reply_chars() -> usize {
    1200
}
fn default_chat_reply() -> String {
    "I'm here to help with your profile README. Ask me to list your repos or read one of them.".into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            responder_temperature: default_responder_temperature(),
            max_reply_chars: default_max_reply_chars(),
            chat_reply: default_chat_reply(),
        }
    }
}

/// GitHub toolbox configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Default GitHub username for repo listing and README reads
    #[serde(default)]
    pub user: String,
}

/// One `[[tools]]` entry in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEntry {
    /// Unique tool id
    pub id: String,

    /// Action verb reported in parameter sets (defaults to the id)
    #[serde(default)]
    pub action: Option<String>,

    /// Trigger hints embedded in the router prompt
    #[serde(default)]
    pub hints: Vec<String>,

    /// Parameter schema, keyed by parameter name
    #[serde(default)]
    pub params: BTreeMap<String, ParamSpec>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.gitteach/config.toml).
    ///
    /// Environment variable overrides (highest priority):
    /// - `GITTEACH_API_URL`
    /// - `GITTEACH_API_KEY`
    /// - `GITTEACH_MODEL`
    /// - `GITTEACH_GITHUB_USER`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(url) = std::env::var("GITTEACH_API_URL") {
            config.backend.api_url = url;
        }
        if config.backend.api_key.is_none() {
            config.backend.api_key = std::env::var("GITTEACH_API_KEY").ok();
        }
        if let Ok(model) = std::env::var("GITTEACH_MODEL") {
            config.backend.model = model;
        }
        if let Ok(user) = std::env::var("GITTEACH_GITHUB_USER") {
            config.github.user = user;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".gitteach")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.api_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "backend.api_url must not be empty".into(),
            ));
        }
        if self.backend.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "backend.model must not be empty".into(),
            ));
        }
        if self.backend.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "backend.request_timeout_secs must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.agent.responder_temperature) {
            return Err(ConfigError::ValidationError(
                "agent.responder_temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.agent.max_reply_chars == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_reply_chars must be > 0".into(),
            ));
        }

        let mut seen = std::collections::BTreeSet::new();
        for tool in &self.tools {
            if tool.id.is_empty() || tool.id == "chat" {
                return Err(ConfigError::ValidationError(format!(
                    "invalid tool id: {:?} (empty and \"chat\" are reserved)",
                    tool.id
                )));
            }
            if !seen.insert(tool.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate tool id: {}",
                    tool.id
                )));
            }
        }

        Ok(())
    }

    /// Build the immutable tool catalog from the `[[tools]]` entries.
    pub fn tool_catalog(&self) -> ToolCatalog {
        ToolCatalog::new(self.tools.iter().map(|entry| ToolDescriptor {
            id: entry.id.clone(),
            action: entry.action.clone().unwrap_or_else(|| entry.id.clone()),
            trigger_hints: entry.hints.clone(),
            params: entry.params.clone(),
        }))
    }

    /// Generate the starter config TOML (for the `onboard` command).
    ///
    /// Ships the default catalog: repository listing and README reads.
    pub fn starter_toml() -> &'static str {
        r#"# GitTeach configuration

[backend]
api_url = "http://localhost:8000/v1"
model = "lfm2.5"
request_timeout_secs = 30

[agent]
responder_temperature = 0.7
max_reply_chars = 1200

[github]
user = ""

[[tools]]
id = "list_repos"
hints = ["list my repositories", "what repos do I have"]

[[tools]]
id = "read_repo"
hints = ["read a repository README", "analyze a project"]

[tools.params.repo]
type = "string"
required = true
description = "repository name"

[tools.params.owner]
type = "string"
description = "repository owner, defaults to the configured user"
"#
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            agent: AgentConfig::default(),
            github: GithubConfig::default(),
            tools: vec![],
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
