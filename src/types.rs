use reqwest::{Method, StatusCode, header::HeaderMap};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tabled::Tabled;

/// Body of the token endpoint response for both grant types.
///
/// `expires_in` is a delta in seconds from the time the response was issued.
/// `refresh_token` is always present for the authorization code grant but
/// may be omitted on a refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub scope: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Options for a single request issued through a transport.
///
/// Defaults to `GET` with no headers.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        RequestOptions {
            method,
            headers: HeaderMap::new(),
        }
    }
}

/// A response returned by a transport.
///
/// `status` and `headers` are kept from the underlying HTTP response so
/// callers can inspect them after the body has been read.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotifyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl SpotifyResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Response body, parsed as JSON when the response declared a JSON content
/// type and passed through as text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(v) => Some(v),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(t) => Some(t),
        }
    }

    /// Deserializes the body into `T`, reading text bodies as JSON.
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        match self {
            ResponseBody::Json(v) => T::deserialize(v),
            ResponseBody::Text(t) => serde_json::from_str(t),
        }
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        ResponseBody::Text(String::new())
    }
}

/// Authorization handshake shared between the login flow and the local
/// callback handler.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state: String,
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Tabled)]
pub struct SessionTableRow {
    pub field: String,
    pub value: String,
}
