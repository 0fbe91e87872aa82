//! Server configuration.
//!
//! A small JSON file, by default `~/.config/koleo-mcp/config.json`:
//!
//! ```json
//! { "email": "you@example.com", "password": "secret" }
//! ```
//!
//! A missing file is not an error; the server then runs unauthenticated.

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::format::plain;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/koleo-mcp/config.json";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Session cookies, name → value. Non-string values are sent as their JSON text.
    #[serde(default)]
    pub auth: Map<String, Value>,
    /// Override for the API origin.
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    /// Load configuration from `path`, or from [`DEFAULT_CONFIG_PATH`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_path(),
        };
        debug!(path = %path.display(), "reading configuration");

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Whether authenticated endpoints can be used.
    pub fn has_credentials(&self) -> bool {
        (self.email.is_some() && self.password.is_some()) || !self.auth.is_empty()
    }

    /// `Cookie` header value built from `auth`, if any cookies are set.
    pub fn cookie_header(&self) -> Option<String> {
        if self.auth.is_empty() {
            return None;
        }
        let cookies: Vec<String> = self
            .auth
            .iter()
            .map(|(name, value)| format!("{name}={}", plain(value)))
            .collect();
        Some(cookies.join("; "))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

pub fn default_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned())
}
