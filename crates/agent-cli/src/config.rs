//! Application Configuration
//!
//! Built once per process from the environment (after `.env` is loaded) and
//! passed down explicitly.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use agent_core::{AgentError, GenerationOptions, Result};
use agent_notify::TelegramConfig;
use agent_runtime::{AnthropicConfig, OpenRouterConfig};

/// Collector defaults
pub const DEFAULT_CITY: &str = "Warsaw";
pub const DEFAULT_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_HISTORY_PATH: &str = "weather_history.json";

/// Command the tool client starts when `TOOL_SERVER_CMD` is unset
pub const DEFAULT_TOOL_SERVER_CMD: &str = "tool-server";

/// Weather collector settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectorSettings {
    pub city: String,
    pub interval: Duration,
    pub history_path: PathBuf,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.into(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
        }
    }
}

impl CollectorSettings {
    /// Read `COLLECTOR_CITY`, `COLLECTOR_INTERVAL_SECS`, `COLLECTOR_HISTORY_PATH`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();
        if let Some(city) = non_empty(&lookup, "COLLECTOR_CITY") {
            settings.city = city;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "COLLECTOR_INTERVAL_SECS")? {
            if secs == 0 {
                return Err(AgentError::Config("COLLECTOR_INTERVAL_SECS must be positive".into()));
            }
            settings.interval = Duration::from_secs(secs);
        }
        if let Some(path) = non_empty(&lookup, "COLLECTOR_HISTORY_PATH") {
            settings.history_path = PathBuf::from(path);
        }
        Ok(settings)
    }
}

/// Process-wide configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Model and token limit for agent requests
    pub generation: GenerationOptions,

    /// `None` when `ANTHROPIC_API_KEY` is unset
    pub anthropic: Option<AnthropicConfig>,

    /// `None` when `OPENROUTER_API_KEY` is unset
    pub openrouter: Option<OpenRouterConfig>,

    /// `None` when the bot token or chat id is unset
    pub telegram: Option<TelegramConfig>,

    pub collector: CollectorSettings,

    /// Program the tool client spawns
    pub tool_server_cmd: String,

    /// Directory `read_file` is confined to
    pub file_root: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut generation = GenerationOptions::default();
        if let Some(model) = non_empty(&lookup, "AGENT_MODEL") {
            generation.model = model;
        }
        if let Some(max_tokens) = parse_var::<u32>(&lookup, "AGENT_MAX_TOKENS")? {
            generation.max_tokens = max_tokens;
        }

        Ok(Self {
            generation,
            anthropic: AnthropicConfig::from_lookup(&lookup).ok(),
            openrouter: OpenRouterConfig::from_lookup(&lookup).ok(),
            telegram: TelegramConfig::from_lookup(&lookup),
            collector: CollectorSettings::from_lookup(&lookup)?,
            tool_server_cmd: non_empty(&lookup, "TOOL_SERVER_CMD")
                .unwrap_or_else(|| DEFAULT_TOOL_SERVER_CMD.into()),
            file_root: non_empty(&lookup, "TOOL_FILE_ROOT")
                .map_or_else(|| PathBuf::from("."), PathBuf::from),
        })
    }

    /// Anthropic settings, or the startup error agent programs report
    pub fn require_anthropic(&self) -> Result<AnthropicConfig> {
        self.anthropic
            .clone()
            .ok_or_else(|| AgentError::Config("ANTHROPIC_API_KEY not set (add it to .env)".into()))
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    non_empty(lookup, key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| AgentError::Config(format!("{key} must be a number, got '{raw}'")))
        })
        .transpose()
}
