//! Configuration loading and config file resolution
//!
//! Bootstrap configuration is a single TOML file. Resolution order for its path:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`AMR_CONFIG`)
//! 3. Platform config directory (`<config_dir>/amr/config.toml`)
//! 4. Built-in defaults (no file)
//!
//! A missing file is never fatal: the caller logs a warning and starts with defaults.
//! A file that exists but cannot be parsed is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "AMR_CONFIG";

/// MusicBrainz web service root
pub const DEFAULT_MUSICBRAINZ_URL: &str = "https://musicbrainz.org/ws/2";

/// Country code emitted when an artist carries no country
pub const DEFAULT_COUNTRY_CODE: &str = "IT";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// MusicBrainz access (optional)
    #[serde(default)]
    pub musicbrainz: MusicBrainzConfig,

    /// Country name → code table extensions (optional)
    #[serde(default)]
    pub countries: CountriesConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// MusicBrainz client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MusicBrainzConfig {
    /// Web service root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Application name sent in the User-Agent header
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Account name (ENV `AMR_MB_USERNAME` takes priority)
    #[serde(default)]
    pub username: Option<String>,

    /// Account password (ENV `AMR_MB_PASSWORD` takes priority)
    #[serde(default)]
    pub password: Option<String>,

    /// Maximum number of candidates requested per search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MusicBrainzConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_name: default_app_name(),
            username: None,
            password: None,
            search_limit: default_search_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Country code table configuration
///
/// `codes` extends the built-in table; an empty `default_code` disables the
/// fallback country clause.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountriesConfig {
    #[serde(default = "default_country_code")]
    pub default_code: String,

    #[serde(default)]
    pub codes: BTreeMap<String, String>,
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            default_code: default_country_code(),
            codes: BTreeMap::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    DEFAULT_MUSICBRAINZ_URL.to_string()
}

fn default_app_name() -> String {
    "amr".to_string()
}

fn default_search_limit() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

/// Resolve which config file to read, if any
///
/// Returns `None` when neither an explicit path nor the platform default exists.
/// Explicit paths (CLI or ENV) are returned even if missing so the caller can
/// report them.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|p| p.exists())
}

/// Platform config file location (`~/.config/amr/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("amr").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
}

/// Load configuration with graceful degradation
///
/// Missing file → warning + defaults. Unreadable or malformed file → error.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = resolve_config_path(cli_arg) else {
        info!("No config file found, using built-in defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} does not exist, using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let config = load_toml_config(&path)?;
    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Validate a configured value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}
