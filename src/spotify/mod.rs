//! # Spotify Authorization Module
//!
//! This module implements the OAuth 2.0 authorization code flow against the
//! Spotify accounts service and the authenticated request path into the
//! Spotify Web API.
//!
//! ## Overview
//!
//! Two types cooperate:
//!
//! - [`SpotifyClient`] holds the application credentials, the base URLs and
//!   the [`Transport`](crate::transport::Transport) every request goes
//!   through. It builds authorization URLs and exchanges authorization
//!   codes for tokens.
//! - [`AuthenticatedUser`] holds one identity's tokens and a handle to the
//!   client that minted it. It refreshes the access token and wraps calls to
//!   the Web API with a single refresh-and-retry on 401.
//!
//! ```text
//! authorization_url ──► user consents in browser ──► redirect with code
//!                                                         │
//!                         SpotifyClient::get_user(code) ◄─┘
//!                                   │
//!                                   ▼
//!                AuthenticatedUser::make_request(endpoint)
//!                    │ 2xx ──► response
//!                    │ 401 ──► refresh_access_token ──► retry once
//!                    │ other ──► Error::Request
//! ```
//!
//! ## Token Endpoint
//!
//! Both grants POST a form to `{auth_base_url}/api/token` with
//! `Authorization: Basic base64(client_id:client_secret)`:
//!
//! - `grant_type=authorization_code&code=..&redirect_uri=..`
//! - `grant_type=refresh_token&refresh_token=..`
//!
//! The response carries `access_token`, `token_type`, `scope`, `expires_in`
//! and, for the code grant, `refresh_token`. A response missing any required
//! field fails with [`Error::Parse`](crate::error::Error::Parse).
//!
//! ## Refresh Strategy
//!
//! Refreshing is purely reactive. Nothing runs in the background and no
//! request is refreshed ahead of time; a 401 from the Web API is the only
//! trigger, and at most one refresh happens per
//! [`make_request`](AuthenticatedUser::make_request) call.
//!
//! ## Thread Safety
//!
//! [`SpotifyClient`] is immutable and cheap to clone, and can be shared by
//! any number of users and tasks. [`AuthenticatedUser`] mutates its tokens
//! through `&mut self`; to share one user across tasks, wrap it in a
//! `tokio::sync::Mutex`.

mod client;
mod user;

pub use client::{ClientConfig, SpotifyClient};
pub use user::AuthenticatedUser;
