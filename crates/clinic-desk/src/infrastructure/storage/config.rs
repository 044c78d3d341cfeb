//! TOML-based configuration for the clinic desk client.
//!
//! The file is optional.  Every field has a default, so a missing file, an
//! empty file and a file written for an older version all load cleanly.
//!
//! ```toml
//! [api]
//! local_url = "http://localhost:8080"
//! production_url = "https://doctor-website-api.onrender.com"
//! page_origin = "file:///index.html"
//! timeout_secs = 15
//! connect_timeout_secs = 10
//!
//! [notifications]
//! duration_ms = 4000
//!
//! [logging]
//! level = "info"
//! ```
//!
//! # Which API origin is used?
//!
//! The client mimics the web pages it replaces: a page served from
//! `localhost`, `127.0.0.1` or a `file:` URL talks to `local_url`, any other
//! page talks to `production_url`.  `page_origin` says where the "page" is
//! considered to be served from.  An explicit `base_url` skips the choice.
//!
//! The admin password is deliberately absent: it is only ever held in memory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::application::api::{resolve_base_url, LOCAL_API_URL, PRODUCTION_API_URL};
use crate::application::gateway::ApiError;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A configured URL is not valid.
    #[error("invalid URL in config: {0}")]
    InvalidUrl(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    /// Explicit API origin; overrides the local/production choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API origin for locally served pages.
    #[serde(default = "default_local_url")]
    pub local_url: String,
    /// API origin for every other page.
    #[serde(default = "default_production_url")]
    pub production_url: String,
    /// Origin the client is treated as being served from.
    #[serde(default = "default_page_origin")]
    pub page_origin: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connection setup timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Toast behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationSettings {
    /// How long a toast stays visible, in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

/// Log output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_local_url() -> String {
    LOCAL_API_URL.to_string()
}
fn default_production_url() -> String {
    PRODUCTION_API_URL.to_string()
}
fn default_page_origin() -> String {
    "file:///index.html".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_duration_ms() -> u64 {
    4000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            local_url: default_local_url(),
            production_url: default_production_url(),
            page_origin: default_page_origin(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ApiSettings {
    /// The API origin these settings select.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `base_url`, `page_origin` or the
    /// chosen origin does not parse.
    pub fn resolved_base_url(&self) -> Result<Url, ConfigError> {
        if let Some(explicit) = &self.base_url {
            return Url::parse(explicit)
                .map_err(|e| ConfigError::InvalidUrl(format!("base_url {explicit}: {e}")));
        }
        let origin = Url::parse(&self.page_origin).map_err(|e| {
            ConfigError::InvalidUrl(format!("page_origin {}: {e}", self.page_origin))
        })?;
        resolve_base_url(&origin, &self.local_url, &self.production_url).map_err(|e| match e {
            ApiError::InvalidUrl(detail) => ConfigError::InvalidUrl(detail),
            other => ConfigError::InvalidUrl(other.to_string()),
        })
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Parses configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_config(text: &str) -> Result<ClientConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Loads configuration from `path`, returning `ClientConfig::default()` if
/// the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &ClientConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
