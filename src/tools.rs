//! Tool bodies and the response envelope.
//!
//! Each tool returns `Result<ToolOutput, ToolError>`; [`Envelope`] turns that
//! into the JSON shape clients see. Nothing below the server layer produces
//! MCP types.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::ConfigError,
    context::ContextError,
    koleo::KoleoError,
};

pub mod board;
pub mod connections;
pub mod links;
pub mod realtime;
pub mod seats;
pub mod stations;
pub mod trains;

/// A successful tool result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    pub data: Value,
    pub summary: String,
    pub koleo_url: String,
}

impl ToolOutput {
    pub fn new(
        data: impl Serialize,
        summary: impl Into<String>,
        koleo_url: impl Into<String>,
    ) -> Result<Self, ToolError> {
        Ok(Self {
            data: serde_json::to_value(data)?,
            summary: summary.into(),
            koleo_url: koleo_url.into(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AuthRequired,
    InvalidParams,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(
        "Authentication required. Create ~/.config/koleo-mcp/config.json with:\n  {{\"email\": \"your@email.com\", \"password\": \"yourpassword\"}}"
    )]
    AuthRequired,

    #[error("{0}")]
    InvalidParams(String),

    #[error("Error: {kind}: {message}")]
    Unknown { kind: String, message: String },
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::NotFound(_) => ErrorKind::NotFound,
            ToolError::AuthRequired => ErrorKind::AuthRequired,
            ToolError::InvalidParams(_) => ErrorKind::InvalidParams,
            ToolError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    fn unknown(kind: &str, message: impl ToString) -> Self {
        ToolError::Unknown {
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<KoleoError> for ToolError {
    fn from(err: KoleoError) -> Self {
        match err {
            KoleoError::NotFound { resource } => ToolError::NotFound(resource),
            KoleoError::AuthRequired => ToolError::AuthRequired,
            other => {
                if let Some(body) = other.body() {
                    tracing::debug!(body, "undecodable Koleo response");
                }
                ToolError::unknown(other.kind(), &other)
            }
        }
    }
}

impl From<ConfigError> for ToolError {
    fn from(err: ConfigError) -> Self {
        ToolError::unknown("ConfigError", err)
    }
}

impl From<ContextError> for ToolError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Config(err) => err.into(),
            ContextError::Client(err) => err.into(),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::unknown("SerializationError", err)
    }
}

/// What a tool call returns to the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success {
        data: Value,
        summary: String,
        koleo_url: String,
    },
    Failure {
        data: Value,
        summary: String,
        error: ErrorKind,
        koleo_url: String,
    },
}

impl Envelope {
    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Failure { .. })
    }
}

impl From<Result<ToolOutput, ToolError>> for Envelope {
    fn from(result: Result<ToolOutput, ToolError>) -> Self {
        match result {
            Ok(ToolOutput {
                data,
                summary,
                koleo_url,
            }) => Envelope::Success {
                data,
                summary,
                koleo_url,
            },
            Err(error) => Envelope::Failure {
                data: Value::Null,
                summary: error.to_string(),
                error: error.kind(),
                koleo_url: String::new(),
            },
        }
    }
}

/// Resolve a caller-supplied date or datetime; `None` means now.
pub fn resolve_when(raw: Option<&str>) -> Result<NaiveDateTime, ToolError> {
    match raw {
        Some(raw) => parse_when(raw),
        None => Ok(Local::now().naive_local()),
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]` (space separator allowed) and RFC 3339.
pub fn parse_when(raw: &str) -> Result<NaiveDateTime, ToolError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    let datetime = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok());
    if let Some(datetime) = datetime {
        return Ok(datetime);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| {
            ToolError::InvalidParams(format!(
                "invalid date {raw:?}: expected ISO format such as 2026-02-27 or 2026-02-27T14:00"
            ))
        })
}

/// `"123"` → `Some(123)`; anything not purely numeric → `None`.
pub fn parse_train_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
