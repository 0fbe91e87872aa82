//! Koleo client error types.

/// Errors from the Koleo HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum KoleoError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 404 for the requested resource
    #[error("{resource}")]
    NotFound { resource: String },

    /// Missing or rejected credentials
    #[error("authentication required")]
    AuthRequired,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}

impl KoleoError {
    /// Short category name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            KoleoError::Http(_) => "HttpError",
            KoleoError::NotFound { .. } => "NotFound",
            KoleoError::AuthRequired => "AuthRequired",
            KoleoError::Api { .. } => "ApiError",
            KoleoError::Json { .. } => "DecodeError",
        }
    }

    /// Excerpt of the response body that failed to decode.
    pub fn body(&self) -> Option<&str> {
        match self {
            KoleoError::Json { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}
