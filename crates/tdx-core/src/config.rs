//! Configuration management for tdx.
//!
//! Loads configuration from ${TDX_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http::resolve_base_url;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for tdx configuration and data directories.
    //!
    //! TDX_HOME resolution order:
    //! 1. TDX_HOME environment variable (if set)
    //! 2. ~/.config/tdx (default)

    use std::path::PathBuf;

    /// Returns the tdx home directory.
    ///
    /// Checks TDX_HOME env var first, falls back to ~/.config/tdx.
    /// Falls back to a relative `.tdx` when no home directory can be found.
    pub fn tdx_home() -> PathBuf {
        if let Ok(home) = std::env::var("TDX_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".tdx"),
            |h| h.join(".config").join("tdx"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        tdx_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        tdx_home().join("session.json")
    }

    /// Returns the directory holding rolling log files.
    pub fn logs_dir() -> PathBuf {
        tdx_home().join("logs")
    }
}

/// Backend endpoint paths, appended to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub todos: String,
    pub login: String,
    pub register: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            todos: "/todos".to_string(),
            login: "/auth/login".to_string(),
            register: "/auth/register".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the todo backend
    pub base_url: String,

    /// Timeout for each request in seconds (0 keeps the transport default)
    pub request_timeout_secs: u32,

    /// Endpoint paths
    pub endpoints: EndpointsConfig,
}

impl Config {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
    const BASE_URL_ENV: &str = "TDX_BASE_URL";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the effective base URL: env > config > default.
    ///
    /// # Errors
    /// Returns an error if the chosen URL is not a valid URL.
    pub fn effective_base_url(&self) -> Result<String> {
        resolve_base_url(
            Some(&self.base_url),
            Self::BASE_URL_ENV,
            Self::DEFAULT_BASE_URL,
        )
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves only the `base_url` field to a specific config file path.
    ///
    /// Creates the file from the default template if it doesn't exist.
    /// Preserves existing fields and comments using `toml_edit`.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the file cannot be updated.
    pub fn save_base_url_to(path: &Path, base_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let trimmed = base_url.trim();
        url::Url::parse(trimmed).with_context(|| format!("Invalid base URL: {trimmed}"))?;

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["base_url"] = value(trimmed);

        Self::write_config(path, &doc.to_string())
    }

    /// Renders the effective configuration as TOML (for `tdx config show`).
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize config to TOML")
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 0,
            endpoints: EndpointsConfig::default(),
        }
    }
}
