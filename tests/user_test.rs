mod common;

use std::sync::Arc;

use common::*;
use reqwest::{
    Method,
    header::{ACCEPT, AUTHORIZATION, HeaderValue},
};
use serde_json::json;
use spotauth::{
    AuthenticatedUser, ClientConfig, Error, SpotifyClient,
    types::{RequestOptions, ResponseBody},
};

// Builds a user through the code exchange and clears the recorded requests.
async fn user_with(stub: &Arc<StubTransport>, access_token: &str) -> AuthenticatedUser {
    stub.push(token_response(
        access_token,
        "initial-scope",
        3600,
        Some("mock-refresh-token"),
    ));
    let user = client_with(stub).get_user("code", "http://cb").await.unwrap();
    stub.clear_requests();
    user
}

#[tokio::test]
async fn test_refresh_posts_refresh_grant() {
    let stub = StubTransport::new(vec![token_response("new-access", "s1", 100, None)]);
    let mut user = AuthenticatedUser::from_refresh_token(client_with(&stub), "mock-refresh-token");

    user.refresh_access_token().await.unwrap();

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url.as_str(), "https://mock.auth.base/URL/api/token");
    assert_eq!(request.options.method, Method::POST);
    assert_eq!(request.header("authorization"), Some(basic_header().as_str()));
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        request.form(),
        vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), "mock-refresh-token".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_refresh_updates_token_state() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "old-access").await;
    stub.push(token_response(
        "mock-access-token",
        "mock-scope-1 mock-scope-2",
        100,
        None,
    ));

    user.refresh_access_token().await.unwrap();

    assert_eq!(user.access_token(), "mock-access-token");
    assert_expires_in(user.access_token_expiry(), 100, 100);
    assert_eq!(user.granted_scopes(), ["mock-scope-1", "mock-scope-2"]);
    // Omitted by the provider, so the old one is kept
    assert_eq!(user.refresh_token(), "mock-refresh-token");
}

#[tokio::test]
async fn test_refresh_takes_rotated_refresh_token() {
    let stub = StubTransport::new(vec![token_response("A2", "s", 60, Some("R2"))]);
    let mut user = AuthenticatedUser::from_refresh_token(client_with(&stub), "R1");

    user.refresh_access_token().await.unwrap();

    assert_eq!(user.refresh_token(), "R2");
}

#[tokio::test]
async fn test_refresh_failure_leaves_state_unchanged() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "old-access").await;
    let expiry = user.access_token_expiry();
    stub.push(json_response(400, json!({ "error": "invalid_grant" })));

    let err = user.refresh_access_token().await.unwrap_err();

    assert_eq!(err.as_request_error().unwrap().status().as_u16(), 400);
    assert_eq!(user.access_token(), "old-access");
    assert_eq!(user.access_token_expiry(), expiry);
    assert_eq!(user.granted_scopes(), ["initial-scope"]);
    assert_eq!(user.refresh_token(), "mock-refresh-token");
}

#[tokio::test]
async fn test_make_request_returns_success_response() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "mock-access-token").await;
    let expected = response(200, ResponseBody::Text("mock-body".to_string()));
    stub.push(expected.clone());

    let actual = user
        .make_request(
            "/pa/th?search=params#fragment",
            Some(RequestOptions::new(Method::PUT)),
            Some("mock-body".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(actual, expected);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.url.as_str(),
        "https://mock.api.base/URL/pa/th?search=params#fragment"
    );
    assert_eq!(request.options.method, Method::PUT);
    assert_eq!(request.body.as_deref(), Some("mock-body"));
    assert_eq!(request.header("authorization"), Some("Bearer mock-access-token"));
}

#[tokio::test]
async fn test_make_request_defaults_to_get() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "A1").await;
    stub.push(json_response(200, json!({ "id": "user" })));

    user.make_request("/me", None, None).await.unwrap();

    let request = &stub.requests()[0];
    assert_eq!(request.options.method, Method::GET);
    assert_eq!(request.body, None);
    assert_eq!(request.header("authorization"), Some("Bearer A1"));
}

#[tokio::test]
async fn test_make_request_keeps_caller_headers() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "A1").await;
    stub.push(response(200, ResponseBody::default()));

    let mut options = RequestOptions::default();
    options
        .headers
        .insert(ACCEPT, HeaderValue::from_static("application/json"));
    options
        .headers
        .insert(AUTHORIZATION, HeaderValue::from_static("Bearer caller-token"));

    user.make_request("/me", Some(options), None).await.unwrap();

    let request = &stub.requests()[0];
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("authorization"), Some("Bearer A1"));
    assert_eq!(request.options.headers.get_all(AUTHORIZATION).iter().count(), 1);
}

#[tokio::test]
async fn test_make_request_returns_any_2xx() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "A1").await;
    stub.push(response(204, ResponseBody::default()));

    let actual = user.make_request("/me/following", None, None).await.unwrap();

    assert_eq!(actual.status.as_u16(), 204);
    assert_eq!(stub.requests().len(), 1);
}

#[tokio::test]
async fn test_make_request_refreshes_and_retries_once_on_401() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "A1").await;
    let retried = json_response(200, json!({ "id": "user" }));
    stub.push(json_response(401, json!({ "error": { "status": 401 } })));
    stub.push(token_response("A2", "read write", 3600, None));
    stub.push(retried.clone());

    let actual = user.make_request("/me", None, None).await.unwrap();

    assert_eq!(actual, retried);
    assert_eq!(user.access_token(), "A2");
    assert_eq!(user.granted_scopes(), ["read", "write"]);

    let requests = stub.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].header("authorization"), Some("Bearer A1"));
    // Exactly one refresh in between
    assert_eq!(requests[1].url.as_str(), "https://mock.auth.base/URL/api/token");
    assert_eq!(
        requests
            .iter()
            .filter(|r| r.url.path().ends_with("/api/token"))
            .count(),
        1
    );
    assert_eq!(requests[2].url, requests[0].url);
    assert_eq!(requests[2].header("authorization"), Some("Bearer A2"));
}

#[tokio::test]
async fn test_make_request_fails_after_second_401() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "A1").await;
    stub.push(json_response(401, json!({})));
    stub.push(token_response("A2", "read", 3600, None));
    stub.push(json_response(401, json!({ "error": "still unauthorized" })));

    let err = user.make_request("/me", None, None).await.unwrap_err();

    let request_error = err.as_request_error().expect("expected a request error");
    assert_eq!(request_error.status().as_u16(), 401);
    assert_eq!(request_error.url().as_str(), "https://mock.api.base/URL/me");
    assert_eq!(
        request_error.response().body,
        ResponseBody::Json(json!({ "error": "still unauthorized" }))
    );
    // No second refresh
    assert_eq!(stub.requests().len(), 3);
}

#[tokio::test]
async fn test_make_request_fails_on_error_after_retry() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "A1").await;
    stub.push(json_response(401, json!({})));
    stub.push(token_response("A2", "read", 3600, None));
    stub.push(json_response(503, json!({})));

    let err = user.make_request("/me", None, None).await.unwrap_err();

    assert_eq!(err.as_request_error().unwrap().status().as_u16(), 503);
}

#[tokio::test]
async fn test_make_request_does_not_refresh_on_other_errors() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "A1").await;
    stub.push(json_response(403, json!({ "error": "forbidden" })));

    let err = user.make_request("/me", None, None).await.unwrap_err();

    assert!(matches!(err, Error::Request(_)));
    assert_eq!(stub.requests().len(), 1);
    assert_eq!(user.access_token(), "A1");
}

#[tokio::test]
async fn test_make_request_surfaces_refresh_failure() {
    let stub = StubTransport::new(vec![]);
    let mut user = user_with(&stub, "A1").await;
    stub.push(json_response(401, json!({})));
    stub.push(json_response(400, json!({ "error": "invalid_grant" })));

    let err = user.make_request("/me", None, None).await.unwrap_err();

    let request_error = err.as_request_error().unwrap();
    assert_eq!(request_error.status().as_u16(), 400);
    assert_eq!(
        request_error.url().as_str(),
        "https://mock.auth.base/URL/api/token"
    );
    assert_eq!(stub.requests().len(), 2);
    assert_eq!(user.access_token(), "A1");
}

#[tokio::test]
async fn test_make_request_from_refresh_token_only() {
    let stub = StubTransport::new(vec![
        json_response(401, json!({})),
        token_response("A1", "user-follow-read", 3600, None),
        json_response(200, json!({ "id": "user" })),
    ]);
    let mut user = AuthenticatedUser::from_refresh_token(client_with(&stub), "R1");
    assert!(user.is_expired());

    let actual = user.make_request("/me", None, None).await.unwrap();

    assert_eq!(actual.body.as_json().unwrap()["id"], "user");
    assert_eq!(user.granted_scopes(), ["user-follow-read"]);
    assert!(!user.is_expired());

    let requests = stub.requests();
    assert_eq!(requests[0].header("authorization"), Some("Bearer "));
    assert_eq!(requests[2].header("authorization"), Some("Bearer A1"));
}

#[tokio::test]
async fn test_make_request_rejects_invalid_endpoint() {
    let stub = StubTransport::new(vec![]);
    let config =
        ClientConfig::new(AUTH_BASE_URL, "https://mock.api.base:8443", CLIENT_ID, CLIENT_SECRET)
            .unwrap();
    let client = SpotifyClient::with_transport(config, stub.clone()).unwrap();
    let mut user = AuthenticatedUser::from_refresh_token(client, "R1");

    // Without a leading slash the endpoint runs into the port
    let err = user.make_request("me", None, None).await.unwrap_err();

    assert!(matches!(err, Error::InvalidEndpoint { .. }), "got {err:?}");
    assert!(stub.requests().is_empty());
}

#[test]
fn test_user_debug_hides_tokens() {
    let stub = StubTransport::new(vec![]);
    let user = AuthenticatedUser::from_refresh_token(client_with(&stub), "secret-refresh");

    assert!(!format!("{user:?}").contains("secret-refresh"));
}
