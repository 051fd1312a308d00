//! Client error types
//!
//! Every failure of a backend call lands in one of four kinds:
//! configuration, transport, protocol or application.

use thiserror::Error;

/// Errors that can occur when calling the spreadsheet API
#[derive(Error, Debug)]
pub enum ClientError {
    /// No API URL configured; raised before any network attempt
    #[error("API URL not configured. Set [api] url in the config file or RENTBOARD_API_URL")]
    MissingUrl,

    /// Configured URL is not an absolute URL
    #[error("Invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network-level failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The POST attempt failed and so did the GET fallback
    #[error("{get} (POST attempt: {post})")]
    BothAttemptsFailed {
        post: Box<ClientError>,
        get: Box<ClientError>,
    },

    /// Response body was empty
    #[error("API returned an empty response. The web app may require sign-in or not be deployed for anonymous access")]
    EmptyBody,

    /// Response body was an HTML page
    #[error("API returned an HTML page instead of JSON. The web app may require sign-in or not be deployed for anonymous access")]
    HtmlBody,

    /// Response body was not valid JSON
    #[error("API returned non-JSON. First 200 chars: {snippet}")]
    NonJson { snippet: String },

    /// Non-success HTTP status
    #[error("HTTP {status} - {message}")]
    Status { status: u16, message: String },

    /// Payload carried `ok: false`
    #[error("{0}")]
    Rejected(String),
}

/// Coarse classification of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Protocol,
    Application,
}

impl ClientError {
    /// Classify the error; a failed fallback reports the GET attempt's kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::MissingUrl | ClientError::InvalidUrl { .. } => ErrorKind::Configuration,
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::BothAttemptsFailed { get, .. } => get.kind(),
            ClientError::EmptyBody | ClientError::HtmlBody | ClientError::NonJson { .. } => {
                ErrorKind::Protocol
            }
            ClientError::Status { .. } | ClientError::Rejected(_) => ErrorKind::Application,
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
