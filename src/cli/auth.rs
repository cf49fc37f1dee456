use std::{sync::Arc, time::Duration};

use reqwest::Method;
use tabled::Table;
use tokio::{sync::Mutex, time::Instant};

use crate::{
    config, error, info,
    server::start_api_server,
    spotify::{AuthenticatedUser, SpotifyClient},
    success,
    types::{PendingAuthorization, SessionTableRow},
    utils, warning,
};

/// Prints the authorization URL for the configured redirect URI.
///
/// A random state is generated when none is given.
pub fn auth_url(
    client: &SpotifyClient,
    scopes: Vec<String>,
    state: Option<String>,
    show_dialog: bool,
) {
    let state = state.unwrap_or_else(utils::generate_state);
    let redirect_uri = config::spotify_redirect_uri();
    let url = client.authorization_url(&redirect_uri, &scopes, &state, show_dialog);

    info!("State: {}", state);
    println!("{}", url);
}

/// Runs the authorization code flow end to end.
///
/// Starts the local callback server, opens the authorization URL in the
/// browser, waits for the redirect and exchanges the code for tokens. When
/// `endpoint` is given, it is requested with the new session afterwards.
pub async fn login(
    client: &SpotifyClient,
    scopes: Vec<String>,
    show_dialog: bool,
    endpoint: Option<String>,
) {
    let redirect_uri = config::spotify_redirect_uri();
    let state = utils::generate_state();

    let shared_state = Arc::new(Mutex::new(Some(PendingAuthorization {
        state: state.clone(),
        code: None,
        error: None,
    })));

    let server_state = Arc::clone(&shared_state);
    let addr = config::server_addr();
    tokio::spawn(async move {
        if let Err(e) = start_api_server(&addr, server_state).await {
            warning!("Callback server failed: {}", e);
        }
    });

    let auth_url = client.authorization_url(&redirect_uri, &scopes, &state, show_dialog);
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let pb = super::spinner("Waiting for authorization in the browser...");
    let code = wait_for_code(shared_state).await;
    pb.finish_and_clear();

    let code = match code {
        Ok(code) => code,
        Err(e) => error!("Authorization failed: {}", e),
    };

    let mut user = match client.get_user(&code, &redirect_uri).await {
        Ok(user) => user,
        Err(e) => error!("Token exchange failed: {}", e),
    };

    success!("Authentication successful!");
    print_session(&user);

    if let Some(endpoint) = endpoint {
        super::request::call(&mut user, &endpoint, Method::GET, None).await;
    }
}

/// Polls the shared state until the callback recorded a code or an error,
/// giving up after 60 seconds.
async fn wait_for_code(
    shared_state: Arc<Mutex<Option<PendingAuthorization>>>,
) -> Result<String, String> {
    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pending) = lock.as_ref() {
            if let Some(error) = &pending.error {
                return Err(format!("access denied ({error})"));
            }
            if let Some(code) = &pending.code {
                return Ok(code.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Err("timed out waiting for the redirect".to_string())
}

/// Prints the current tokens of `user`; the access token is masked.
pub(crate) fn print_session(user: &AuthenticatedUser) {
    let rows = vec![
        SessionTableRow {
            field: "access token".to_string(),
            value: utils::mask_token(user.access_token()),
        },
        SessionTableRow {
            field: "expires at".to_string(),
            value: user.access_token_expiry().to_rfc3339(),
        },
        SessionTableRow {
            field: "granted scopes".to_string(),
            value: user.granted_scopes().join(" "),
        },
        SessionTableRow {
            field: "refresh token".to_string(),
            value: user.refresh_token().to_string(),
        },
    ];

    println!("{}", Table::new(rows));
}
