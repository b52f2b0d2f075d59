//! Error types.
//!
//! Two families live here. [`Error`] is for infrastructure: binding a port,
//! reading configuration, building the HTTP client. [`RelayError`] is the
//! per-request taxonomy of the relay route; every variant renders as the JSON
//! error envelope and never reaches hyper as a protocol error.

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::response::{IntoResponse, Response};

/// Startup and serving failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid upstream url `{url}`: {source}")]
    UpstreamUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Why a relay request did not produce the upstream's body.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing sign or day parameter")]
    MissingParameter,

    /// The upstream answered with anything other than `200 OK`.
    #[error("Failed to fetch horoscope data")]
    Upstream { status: StatusCode },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] serde_json::Error),
}

impl RelayError {
    /// Local status for this failure.
    ///
    /// Upstream failures are always 500, whatever the upstream said; the
    /// upstream code travels in the body instead.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn envelope(&self) -> Envelope {
        let status_code = match self {
            Self::Upstream { status } => Some(status.as_u16()),
            _ => None,
        };
        Envelope { success: false, error: self.to_string(), status_code }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        Response::json(self.status(), &self.envelope())
    }
}

/// The JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl Envelope {
    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, error: error.into(), status_code: None }
    }
}
