//! Error types for the authorization code client.

use url::Url;

use crate::types::SpotifyResponse;

/// Errors returned by client, user and transport operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The provider answered with a status the operation does not accept.
    #[error(transparent)]
    Request(Box<RequestError>),

    #[error("malformed response from {url}: {detail}")]
    Parse { url: Url, detail: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}

impl Error {
    /// Returns the wrapped [`RequestError`] if this error came from a
    /// rejected request.
    pub fn as_request_error(&self) -> Option<&RequestError> {
        match self {
            Error::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RequestError> for Error {
    fn from(e: RequestError) -> Self {
        Error::Request(Box::new(e))
    }
}

/// A request the provider rejected.
///
/// Carries the URL that was requested and the complete response (status,
/// headers and body) so callers can inspect what the provider returned.
#[derive(Debug, thiserror::Error)]
#[error("{message} (status {}, url {url})", .response.status)]
pub struct RequestError {
    message: String,
    url: Url,
    response: SpotifyResponse,
}

impl RequestError {
    pub fn new(message: impl Into<String>, url: Url, response: SpotifyResponse) -> Self {
        RequestError {
            message: message.into(),
            url,
            response,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> reqwest::StatusCode {
        self.response.status
    }

    pub fn response(&self) -> &SpotifyResponse {
        &self.response
    }

    pub fn into_response(self) -> SpotifyResponse {
        self.response
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
