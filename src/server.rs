use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    api,
    error::{Error, Result},
    types::PendingAuthorization,
};

/// Serves the OAuth redirect target until the process exits.
///
/// `/callback` records the authorization code into `state`; `/health`
/// reports liveness and the state of the pending authorization.
pub async fn start_api_server(
    addr: &str,
    state: Arc<Mutex<Option<PendingAuthorization>>>,
) -> Result<()> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state));

    let addr = SocketAddr::from_str(addr)
        .map_err(|e| Error::Config(format!("invalid server address '{addr}': {e}")))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Config(format!("cannot bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Config(format!("callback server stopped: {e}")))
}
