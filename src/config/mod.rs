//! Configuration management.
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `AI_NEWS` (nested keys separated by
//! `__`, e.g. `AI_NEWS_FETCH__TIMEOUT_SECS=5`).

mod file_config;

pub use file_config::{
    find_config_file, user_config_path, ConfigFile, CONFIG_FILE_NAME, LOCAL_CONFIG_FILE,
};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::FeedSource;
use crate::pipeline::{
    OrchestratorSettings, DEFAULT_MAX_CONCURRENT, NEWS_SUMMARY_CAP, PAPER_SUMMARY_CAP,
};
use crate::report::ReportLimits;
use crate::sources::{FeedRegistry, SourceError, ARXIV_API_URL};
use crate::utils::DEFAULT_USER_AGENT;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "AI_NEWS";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub papers: PapersConfig,

    #[serde(default)]
    pub reports: ReportsConfig,

    /// Feed sources; an empty list means the built-in feeds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feeds: Vec<FeedSource>,
}

/// Feed fetching settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-source timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// Budget for a whole fan-out, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_timeout_secs: Option<u64>,

    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Collapse the same story reported by several feeds
    #[serde(default = "default_true")]
    pub dedupe: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            overall_timeout_secs: None,
            max_concurrent: default_max_concurrent(),
            user_agent: default_user_agent(),
            dedupe: true,
        }
    }
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

/// Paper search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PapersConfig {
    #[serde(default = "default_papers_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_papers_timeout")]
    pub timeout_secs: u64,

    /// Maximum abstract length in characters
    #[serde(default = "default_papers_summary_cap")]
    pub summary_cap: usize,
}

impl Default for PapersConfig {
    fn default() -> Self {
        Self {
            endpoint: default_papers_endpoint(),
            timeout_secs: default_papers_timeout(),
            summary_cap: default_papers_summary_cap(),
        }
    }
}

fn default_papers_endpoint() -> String {
    ARXIV_API_URL.to_string()
}

fn default_papers_timeout() -> u64 {
    30
}

fn default_papers_summary_cap() -> usize {
    PAPER_SUMMARY_CAP
}

/// Report sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Items per category section in the daily report
    #[serde(default = "default_daily_limit")]
    pub daily_limit: usize,

    /// Items in the weekly roundup section
    #[serde(default = "default_weekly_limit")]
    pub weekly_limit: usize,

    /// Items per weekly focus section
    #[serde(default = "default_focus_limit")]
    pub focus_limit: usize,

    /// Papers in the daily papers section
    #[serde(default = "default_papers_limit")]
    pub papers_limit: usize,

    /// Maximum news summary length in characters
    #[serde(default = "default_summary_cap")]
    pub summary_cap: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            weekly_limit: default_weekly_limit(),
            focus_limit: default_focus_limit(),
            papers_limit: default_papers_limit(),
            summary_cap: default_summary_cap(),
        }
    }
}

impl ReportsConfig {
    pub fn limits(&self) -> ReportLimits {
        ReportLimits {
            daily: self.daily_limit,
            weekly: self.weekly_limit,
            focus: self.focus_limit,
            papers: self.papers_limit,
        }
    }
}

fn default_daily_limit() -> usize {
    10
}

fn default_weekly_limit() -> usize {
    50
}

fn default_focus_limit() -> usize {
    10
}

fn default_papers_limit() -> usize {
    10
}

fn default_summary_cap() -> usize {
    NEWS_SUMMARY_CAP
}

impl Config {
    /// Check ranges and feed definitions
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be positive".into()));
        }
        if self.fetch.overall_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "fetch.overall_timeout_secs must be positive".into(),
            ));
        }
        if self.fetch.max_concurrent == 0 {
            return Err(ConfigError::Invalid("fetch.max_concurrent must be positive".into()));
        }
        if self.papers.timeout_secs == 0 {
            return Err(ConfigError::Invalid("papers.timeout_secs must be positive".into()));
        }
        check_url("papers.endpoint", &self.papers.endpoint)?;

        let positive = [
            ("reports.daily_limit", self.reports.daily_limit),
            ("reports.weekly_limit", self.reports.weekly_limit),
            ("reports.focus_limit", self.reports.focus_limit),
            ("reports.papers_limit", self.reports.papers_limit),
            ("reports.summary_cap", self.reports.summary_cap),
            ("papers.summary_cap", self.papers.summary_cap),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{} must be positive", key)));
        }

        for feed in &self.feeds {
            check_url(&format!("feed '{}'", feed.name), &feed.endpoint)?;
        }
        self.registry().map(|_| ())
    }

    /// The feed registry described by this configuration
    pub fn registry(&self) -> Result<FeedRegistry, ConfigError> {
        if self.feeds.is_empty() {
            return Ok(FeedRegistry::builtin());
        }
        FeedRegistry::new(self.feeds.clone()).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            per_source_timeout: Duration::from_secs(self.fetch.timeout_secs),
            overall_timeout: self.fetch.overall_timeout_secs.map(Duration::from_secs),
            max_concurrent: self.fetch.max_concurrent,
            dedupe: self.fetch.dedupe,
        }
    }
}

fn check_url(what: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ConfigError::Invalid(format!("{} has an invalid URL '{}': {}", what, value, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid(format!(
            "{} uses unsupported scheme '{}'",
            what, other
        ))),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to set up HTTP client: {0}")]
    Client(#[from] SourceError),
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        tracing::debug!("Loading configuration from {}", path.display());
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
