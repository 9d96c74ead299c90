//! Configuration module for Dewdrop.

use serde::Deserialize;
use std::path::Path;

use crate::{DewdropError, Result};

/// Feed fetching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    /// Feed URLs to aggregate, in digest order.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Maximum items taken from each feed.
    #[serde(default = "default_max_items_per_feed")]
    pub max_items_per_feed: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_max_items_per_feed() -> usize {
    25
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            urls: vec![],
            max_items_per_feed: default_max_items_per_feed(),
            max_feed_size_bytes: default_max_feed_size(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Categorization configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesConfig {
    /// Path to the JSON category rules file. Empty means built-in rules.
    #[serde(default)]
    pub rules_path: String,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            rules_path: String::new(),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory where digest files are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Default export format (html or markdown).
    #[serde(default = "default_format")]
    pub format: String,
    /// Digest title prefix.
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,
    /// Timezone for digest dates (e.g., "America/New_York", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Sequence number assigned to the first digest when no state exists.
    #[serde(default = "default_start_sequence")]
    pub start_sequence: u64,
    /// Path to the digest sequence state file.
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

fn default_output_dir() -> String {
    "digests".to_string()
}

fn default_format() -> String {
    "html".to_string()
}

fn default_title_prefix() -> String {
    "Dew Drop".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_start_sequence() -> u64 {
    1
}

fn default_state_path() -> String {
    "data/dewdrop-state.json".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: default_format(),
            title_prefix: default_title_prefix(),
            timezone: default_timezone(),
            start_sequence: default_start_sequence(),
            state_path: default_state_path(),
        }
    }
}

/// WordPress publishing configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WordPressConfig {
    /// Whether WordPress publishing is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Site base URL (e.g., "https://blog.example.com").
    #[serde(default)]
    pub site_url: String,
    /// WordPress username.
    #[serde(default)]
    pub username: String,
    /// Application password (must be set if enabled).
    #[serde(default)]
    pub app_password: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/dewdrop.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Feed fetching configuration.
    #[serde(default)]
    pub feeds: FeedsConfig,
    /// Categorization configuration.
    #[serde(default)]
    pub categories: CategoriesConfig,
    /// Export configuration.
    #[serde(default)]
    pub export: ExportConfig,
    /// WordPress publishing configuration.
    #[serde(default)]
    pub wordpress: WordPressConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DewdropError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DewdropError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DEWDROP_WP_APP_PASSWORD`: Override the WordPress application password
    pub fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var("DEWDROP_WP_APP_PASSWORD") {
            if !password.is_empty() {
                self.wordpress.app_password = password;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - WordPress publishing is enabled but site URL, username, or
    ///   application password is not set
    /// - The export format is not html or markdown
    pub fn validate(&self) -> Result<()> {
        if self.wordpress.enabled {
            if self.wordpress.site_url.is_empty() {
                return Err(DewdropError::Validation(
                    "WordPress publishing is enabled but site_url is not set".to_string(),
                ));
            }
            if self.wordpress.username.is_empty() {
                return Err(DewdropError::Validation(
                    "WordPress publishing is enabled but username is not set".to_string(),
                ));
            }
            if self.wordpress.app_password.is_empty() {
                return Err(DewdropError::Validation(
                    "WordPress publishing is enabled but app_password is not set. \
                     Set it in dewdrop.toml or via DEWDROP_WP_APP_PASSWORD environment variable."
                        .to_string(),
                ));
            }
        }
        match self.export.format.as_str() {
            "html" | "markdown" => {}
            other => {
                return Err(DewdropError::Validation(format!(
                    "unknown export format: {other} (expected html or markdown)"
                )));
            }
        }
        Ok(())
    }
}
