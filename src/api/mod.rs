//! # API Module
//!
//! HTTP endpoints served by the local callback server while the login
//! command waits for the user to grant access.
//!
//! ## Endpoints
//!
//! - [`callback`] - Target of the accounts service redirect. Checks the
//!   `state` parameter against the pending authorization and records either
//!   the authorization `code` or the `error` the provider sent back. The code
//!   is exchanged for tokens by the login flow, not by the handler.
//! - [`health`] - Returns service name, version and whether the pending
//!   authorization is still waiting, received or denied.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use spotauth::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health))
//!     .layer(Extension(state));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
