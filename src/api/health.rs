use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::types::PendingAuthorization;

/// Reports liveness and where the login handshake stands.
///
/// `authorization` is `idle` when no login is running, `waiting` until the
/// redirect arrives, then `received` or `denied`.
pub async fn health(
    Extension(shared_state): Extension<Arc<Mutex<Option<PendingAuthorization>>>>,
) -> Json<Value> {
    let authorization = match shared_state.lock().await.as_ref() {
        None => "idle",
        Some(pending) if pending.error.is_some() => "denied",
        Some(pending) if pending.code.is_some() => "received",
        Some(_) => "waiting",
    };

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authorization": authorization
    }))
}
