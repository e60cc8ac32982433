//! Error types for the panel core.

/// Errors surfaced by the dispatcher, the transports and the log client.
///
/// Most runtime failures never reach the caller as a `PanelError`: a failed
/// request only produces a diagnostic. These variants cover the failures a
/// caller can act on.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Registration was attempted under a scope the registry was not built with
    #[error("Invalid scope: {0}")]
    InvalidScope(String),
    /// No handler is registered for the scope/object pair
    #[error("Unknown endpoint: {scope}/{object}")]
    UnknownEndpoint { scope: String, object: String },
    /// A base URL or request path could not be parsed or joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The HTTP request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),
    /// The full-status body was not the expected JSON document
    #[error("Status decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for PanelError {
    fn from(err: reqwest::Error) -> Self {
        PanelError::Transport(err.to_string())
    }
}
