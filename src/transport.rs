//! Request seam between the OAuth logic and the network.
//!
//! [`SpotifyClient`](crate::spotify::SpotifyClient) never builds HTTP
//! requests itself. Every call goes through a [`Transport`], which takes a
//! URL, typed request options and an optional body and returns a
//! [`SpotifyResponse`]. [`ReqwestTransport`] is the default; tests inject
//! their own implementation.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::{
    error::{Error, Result},
    types::{RequestOptions, ResponseBody, SpotifyResponse},
};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request and return its status, headers and body.
    async fn send(
        &self,
        url: Url,
        options: RequestOptions,
        body: Option<String>,
    ) -> Result<SpotifyResponse>;
}

impl std::fmt::Debug for dyn Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").finish()
    }
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        url: Url,
        options: RequestOptions,
        body: Option<String>,
    ) -> Result<SpotifyResponse> {
        let mut request = self
            .client
            .request(options.method, url.clone())
            .headers(options.headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| Error::Transport {
            url: url.clone(),
            source: Box::new(e),
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let is_json = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let text = response.text().await.map_err(|e| Error::Transport {
            url: url.clone(),
            source: Box::new(e),
        })?;

        // A body that claims to be JSON but is not stays text, so the caller
        // still sees the status.
        let body = if is_json && !text.is_empty() {
            match serde_json::from_str(&text) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) => {
                    tracing::debug!(%url, %status, error = %e, "body is not valid JSON");
                    ResponseBody::Text(text)
                }
            }
        } else {
            ResponseBody::Text(text)
        };

        Ok(SpotifyResponse {
            status,
            headers,
            body,
        })
    }
}
