#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use reqwest::{StatusCode, header::HeaderMap};
use serde_json::{Value, json};
use spotauth::{
    ClientConfig, SpotifyClient, Transport,
    error::Result,
    types::{RequestOptions, ResponseBody, SpotifyResponse},
};
use url::Url;

pub const AUTH_BASE_URL: &str = "https://mock.auth.base/URL";
pub const API_BASE_URL: &str = "https://mock.API.base/URL";
pub const CLIENT_ID: &str = "mock-client-id";
pub const CLIENT_SECRET: &str = "mock-client-secret";

/// One request as seen by the stub transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: Url,
    pub options: RequestOptions,
    pub body: Option<String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.options.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Form body decoded into sorted key/value pairs.
    pub fn form(&self) -> Vec<(String, String)> {
        let body = self.body.as_deref().unwrap_or_default();
        let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        pairs.sort();
        pairs
    }
}

/// Transport that records every request and answers from a queue.
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<SpotifyResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    pub fn new(responses: Vec<SpotifyResponse>) -> Arc<Self> {
        Arc::new(StubTransport {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, response: SpotifyResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(
        &self,
        url: Url,
        options: RequestOptions,
        body: Option<String>,
    ) -> Result<SpotifyResponse> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest { url, options, body });
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no response queued for stub transport"))
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::new(AUTH_BASE_URL, API_BASE_URL, CLIENT_ID, CLIENT_SECRET).unwrap()
}

pub fn client_with(stub: &Arc<StubTransport>) -> SpotifyClient {
    SpotifyClient::with_transport(test_config(), stub.clone()).unwrap()
}

pub fn response(status: u16, body: ResponseBody) -> SpotifyResponse {
    SpotifyResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
        body,
    }
}

pub fn json_response(status: u16, value: Value) -> SpotifyResponse {
    response(status, ResponseBody::Json(value))
}

pub fn token_response(
    access_token: &str,
    scope: &str,
    expires_in: u64,
    refresh_token: Option<&str>,
) -> SpotifyResponse {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "scope": scope,
        "expires_in": expires_in,
    });
    if let Some(refresh_token) = refresh_token {
        body["refresh_token"] = json!(refresh_token);
    }
    json_response(200, body)
}

pub fn basic_header() -> String {
    spotauth::utils::basic_credentials(CLIENT_ID, CLIENT_SECRET)
}

/// Asserts `actual` lies within `tolerance_ms` of now plus `seconds`.
pub fn assert_expires_in(actual: chrono::DateTime<chrono::Utc>, seconds: i64, tolerance_ms: i64) {
    let expected = chrono::Utc::now() + chrono::TimeDelta::seconds(seconds);
    let deviation = (actual - expected).num_milliseconds().abs();
    assert!(
        deviation < tolerance_ms,
        "expiry deviates by {deviation}ms from now + {seconds}s"
    );
}
