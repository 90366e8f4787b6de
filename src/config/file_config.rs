//! Configuration file discovery and writing.
//!
//! # Configuration File Format
//!
//! ```toml
//! [fetch]
//! timeout_secs = 15
//! overall_timeout_secs = 30
//! max_concurrent = 16
//! user_agent = "ai-news-mcp/0.1.0"
//! dedupe = true
//!
//! [papers]
//! endpoint = "http://export.arxiv.org/api/query"
//! timeout_secs = 30
//! summary_cap = 300
//!
//! [reports]
//! daily_limit = 10
//! weekly_limit = 50
//! focus_limit = 10
//! papers_limit = 10
//! summary_cap = 200
//!
//! # Replaces the built-in feeds when present
//! [[feeds]]
//! name = "Hugging Face Blog"
//! url = "https://huggingface.co/blog/feed.xml"
//! category = "research"
//! ```

use std::path::{Path, PathBuf};

use super::{Config, ConfigError};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "ai-news.toml";

/// File name inside the per-user config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

const APP_DIR: &str = "ai-news-mcp";

/// Locate the configuration file to load.
///
/// An explicit path always wins, even if it does not exist, so that a typo
/// surfaces as a load error. Otherwise `./ai-news.toml` is tried, then
/// `<config dir>/ai-news-mcp/config.toml`.
pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// The default location for a new per-user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// A configuration as written to disk
#[derive(Debug, Default)]
pub struct ConfigFile {
    pub config: Config,
}

impl ConfigFile {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Read and validate a TOML file without environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(Self { config })
    }

    /// Write as TOML, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }
}
