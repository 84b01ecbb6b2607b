//! Configuration
//!
//! Settings come from a TOML file, then `MORALEDU_*` environment variables
//! on top. Every section and field is optional; a missing file yields the
//! built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address every relative endpoint path is joined onto
    pub base_url: String,

    /// Also send cookies (legacy session-cookie mode, additive to the token)
    pub with_credentials: bool,

    /// Unset means requests never time out
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            with_credentials: true,
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Where the auth token is persisted
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let file = match dirs::data_local_dir() {
            Some(dir) => dir.join("moraledu").join("session.toml"),
            None => PathBuf::from(".moraledu_session.toml"),
        };
        Self { file }
    }
}

/// Output style of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for terminals
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's targets; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Candidate config files, most specific first
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("moraledu").join("config.toml"));
    }
    paths.push(PathBuf::from("moraledu.toml"));
    paths
}

impl Config {
    /// Parse a config file without environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a config file, then apply `MORALEDU_*` overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// First readable file from [`search_paths`], else defaults; env applies either way.
    /// A broken file is skipped with a warning.
    pub fn load_default() -> Self {
        for path in search_paths().iter().filter(|p| p.is_file()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded config");
                    return config;
                }
                Err(e) => tracing::warn!(error = %e, "Skipping config file"),
            }
        }

        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("MORALEDU_API_URL") {
            self.api.base_url = url;
        }
        match lookup("MORALEDU_WITH_CREDENTIALS").map(|v| v.parse::<bool>()) {
            Some(Ok(flag)) => self.api.with_credentials = flag,
            Some(Err(_)) => tracing::warn!("Ignoring MORALEDU_WITH_CREDENTIALS, expected true or false"),
            None => {}
        }
        if let Some(file) = lookup("MORALEDU_SESSION_FILE") {
            self.session.file = PathBuf::from(file);
        }
        if let Some(level) = lookup("MORALEDU_LOG_LEVEL") {
            self.logging.level = level;
        }
        match lookup("MORALEDU_LOG_FORMAT").map(|v| v.parse::<LogFormat>()) {
            Some(Ok(format)) => self.logging.format = format,
            Some(Err(e)) => tracing::warn!(error = %e, "Ignoring MORALEDU_LOG_FORMAT"),
            None => {}
        }
    }
}

/// Commented template for `moraledu config`
pub fn generate_default_config() -> String {
    r#"# moraledu client settings
#
# Overridable from the environment:
#   MORALEDU_API_URL, MORALEDU_WITH_CREDENTIALS, MORALEDU_SESSION_FILE,
#   MORALEDU_LOG_LEVEL, MORALEDU_LOG_FORMAT

[api]
# Endpoint paths are joined onto this
base_url = "http://127.0.0.1:8000/api"

# Send cookies alongside the token
with_credentials = true

# Seconds; leave unset to wait indefinitely
# request_timeout_secs = 30

[session]
# Defaults to <data dir>/moraledu/session.toml
# file = "/home/me/.local/share/moraledu/session.toml"

[logging]
# trace | debug | info | warn | error
level = "info"

# pretty | json
format = "pretty"
"#
    .to_string()
}
