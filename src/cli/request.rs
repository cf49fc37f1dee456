use reqwest::{
    Method,
    header::{CONTENT_TYPE, HeaderValue},
};

use crate::{
    error,
    error::Error,
    info,
    spotify::{AuthenticatedUser, SpotifyClient},
    types::{RequestOptions, ResponseBody},
    warning,
};

/// Calls `endpoint` on behalf of the user owning `refresh_token`.
///
/// The user starts without an access token, so the first attempt is
/// answered with 401 and goes through the refresh-and-retry path.
pub async fn request(
    client: &SpotifyClient,
    refresh_token: String,
    endpoint: String,
    method: Method,
    data: Option<String>,
) {
    let mut user = AuthenticatedUser::from_refresh_token(client.clone(), refresh_token.clone());
    call(&mut user, &endpoint, method, data).await;

    if user.refresh_token() != refresh_token {
        info!("Refresh token was rotated: {}", user.refresh_token());
    }
    super::auth::print_session(&user);
}

pub(crate) async fn call(
    user: &mut AuthenticatedUser,
    endpoint: &str,
    method: Method,
    data: Option<String>,
) {
    let mut options = RequestOptions::new(method);
    if data.is_some() {
        options
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    let pb = super::spinner("Calling Spotify Web API...");
    let result = user.make_request(endpoint, Some(options), data).await;
    pb.finish_and_clear();

    match result {
        Ok(response) => {
            info!("{} {}", response.status, endpoint);
            print_body(&response.body);
        }
        Err(Error::Request(e)) => {
            warning!("{}", e);
            print_body(&e.response().body);
            error!("Request to {} failed.", endpoint);
        }
        Err(e) => error!("Request to {} failed: {}", endpoint, e),
    }
}

fn print_body(body: &ResponseBody) {
    match body {
        ResponseBody::Json(value) => match serde_json::to_string_pretty(value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", value),
        },
        ResponseBody::Text(text) if text.is_empty() => {}
        ResponseBody::Text(text) => println!("{}", text),
    }
}
